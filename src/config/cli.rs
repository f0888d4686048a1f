//! Command-line flags.
//!
//! Every flag is optional so that only values the operator actually set
//! override the config file. Precedence: flag > environment > file > default.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{AppConfig, LogFormat};

#[derive(Debug, Parser, Default)]
#[command(name = "example-service")]
#[command(about = "Template microservice that self-registers on an API gateway", long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// API Gateway admin url.
    #[arg(long = "gw")]
    pub gateway_admin_url: Option<String>,

    /// The name of this service.
    #[arg(long, env = "SERVICE_NAME")]
    pub name: Option<String>,

    /// Internal domain for the server.
    #[arg(long)]
    pub domain: Option<String>,

    /// Path pattern used for routing requests.
    #[arg(long)]
    pub path: Option<String>,

    /// Skip Gateway self-registration.
    #[arg(long = "skipgw")]
    pub skip_registration: bool,

    /// Namespace segment of the gateway route.
    #[arg(long, env = "SERVICE_NAMESPACE")]
    pub namespace: Option<String>,

    /// Organization segment of the gateway route.
    #[arg(long, env = "SERVICE_ORGANIZATION")]
    pub organization: Option<String>,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Expose Prometheus metrics on this address.
    #[arg(long)]
    pub metrics: Option<String>,
}

impl Cli {
    /// Overlay the values set on the command line (or via env) onto `config`.
    pub fn apply(self, config: &mut AppConfig) {
        let service = &mut config.service;
        if let Some(port) = self.port {
            service.port = port;
        }
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            service.name = name;
        }
        if let Some(domain) = self.domain {
            service.domain = domain;
        }
        if let Some(path) = self.path {
            service.path = path;
        }
        if let Some(namespace) = self.namespace.filter(|n| !n.is_empty()) {
            service.namespace = namespace;
        }
        if let Some(organization) = self.organization.filter(|o| !o.is_empty()) {
            service.organization = organization;
        }

        if let Some(url) = self.gateway_admin_url {
            config.gateway.admin_url = url;
        }
        if self.skip_registration {
            config.gateway.skip_registration = true;
        }

        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(addr) = self.metrics {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "example-service",
            "-p",
            "9090",
            "--gw",
            "http://gateway:8001",
            "--name",
            "orders",
            "--path",
            "/orders",
            "--skipgw",
            "--log-format",
            "json",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.service.port, 9090);
        assert_eq!(config.service.name, "orders");
        assert_eq!(config.service.path, "/orders");
        assert_eq!(config.service.domain, "service.consul");
        assert_eq!(config.gateway.admin_url, "http://gateway:8001");
        assert!(config.gateway.skip_registration);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unset_flags_keep_file_values() {
        let mut config = AppConfig::default();
        config.service.name = "from-file".into();
        config.gateway.skip_registration = true;

        Cli::default().apply(&mut config);

        assert_eq!(config.service.name, "from-file");
        assert!(config.gateway.skip_registration);
    }

    #[test]
    fn test_metrics_flag_enables_exporter() {
        let cli = Cli {
            metrics: Some("127.0.0.1:9100".into()),
            ..Default::default()
        };
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9100");
    }
}
