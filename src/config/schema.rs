//! Configuration schema definitions.
//!
//! `AppConfig` mirrors the TOML file layout. The dispatcher and registrar
//! never see it directly: bootstrap derives an immutable [`ServiceConfig`]
//! from it once and hands that out instead.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Identity of the service and the path it serves.
    pub service: ServiceSettings,

    /// API gateway self-registration.
    pub gateway: GatewayConfig,

    /// Listener settings.
    pub listener: ListenerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Derive the immutable per-process service record.
    pub fn service_config(&self) -> ServiceConfig {
        let s = &self.service;
        ServiceConfig {
            name: s.name.clone(),
            port: s.port,
            path: s.path.clone(),
            virtual_host: format!("{}.{}", s.name, s.domain),
            route_pattern: format!(
                "/resource/{}/{}/{}",
                s.namespace,
                s.organization,
                s.path.trim_start_matches('/')
            ),
        }
    }

    /// Socket address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.bind_host, self.service.port)
    }
}

/// Service identity settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name, also used as the gateway entity name.
    pub name: String,

    /// Listen port.
    pub port: u16,

    /// Path served by the dispatcher (e.g., "/example").
    pub path: String,

    /// Internal DNS domain; the virtual host is `<name>.<domain>`.
    pub domain: String,

    /// Namespace segment of the gateway route pattern.
    pub namespace: String,

    /// Organization segment of the gateway route pattern.
    pub organization: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "example-service".to_string(),
            port: 8080,
            path: "/example".to_string(),
            domain: "service.consul".to_string(),
            namespace: "default".to_string(),
            organization: "default".to_string(),
        }
    }
}

/// Gateway registration settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Admin API base URL of the gateway.
    pub admin_url: String,

    /// Skip self-registration entirely.
    pub skip_registration: bool,

    /// Timeout for each admin API call, in seconds.
    pub timeout_secs: u64,

    /// Host announced as the upstream target. Falls back to `$HOSTNAME`,
    /// then to the service name.
    pub target_host: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            admin_url: "http://kong:8001".to_string(),
            skip_registration: false,
            timeout_secs: 10,
            target_host: None,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (port comes from the service settings).
    pub bind_host: String,

    /// Largest request body the echo branch will read.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log line format.
    pub log_format: LogFormat,

    /// Default `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub log_filter: String,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: "example_service=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Immutable record describing this service instance.
///
/// Constructed once at startup and shared read-only with the dispatcher
/// and the gateway registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub name: String,
    pub port: u16,
    /// Path the dispatcher listens on.
    pub path: String,
    /// `<name>.<domain>`, announced to the gateway.
    pub virtual_host: String,
    /// Path pattern the gateway routes to this service.
    pub route_pattern: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_config() {
        let service = AppConfig::default().service_config();
        assert_eq!(service.name, "example-service");
        assert_eq!(service.port, 8080);
        assert_eq!(service.path, "/example");
        assert_eq!(service.virtual_host, "example-service.service.consul");
        assert_eq!(service.route_pattern, "/resource/default/default/example");
    }

    #[test]
    fn test_route_pattern_uses_namespace_and_organization() {
        let mut config = AppConfig::default();
        config.service.namespace = "acme".into();
        config.service.organization = "billing".into();
        config.service.path = "/invoices/".into();

        let service = config.service_config();
        assert_eq!(service.route_pattern, "/resource/acme/billing/invoices/");
    }

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        config.service.port = 9000;
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }
}
