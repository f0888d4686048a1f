//! Kong admin API registrar.
//!
//! Registration creates or updates, in order:
//! 1. an upstream named after the virtual host,
//! 2. a target `<host>:<port>` on that upstream (only if not already listed),
//! 3. a service pointing at the upstream,
//! 4. a route on that service for the service's route pattern.

use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::config::{GatewayConfig, ServiceConfig};
use crate::gateway::{Registrar, RegistrationError};

/// Weight given to a newly added target.
const DEFAULT_TARGET_WEIGHT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
struct TargetList {
    #[serde(default)]
    data: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    target: String,
}

/// Registrar talking to a Kong admin endpoint.
#[derive(Debug, Clone)]
pub struct KongGateway {
    client: Client,
    admin_url: Url,
    target_host: Option<String>,
}

impl KongGateway {
    /// Create a registrar for the admin API at `config.admin_url`.
    pub fn new(config: &GatewayConfig) -> Result<Self, RegistrationError> {
        let admin_url = Url::parse(&config.admin_url).map_err(|e| {
            RegistrationError::InvalidAdminUrl {
                url: config.admin_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if admin_url.cannot_be_a_base() {
            return Err(RegistrationError::InvalidAdminUrl {
                url: config.admin_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let target_host = config
            .target_host
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .filter(|h| !h.is_empty());

        Ok(Self {
            client,
            admin_url,
            target_host,
        })
    }

    /// Admin URL with `segments` appended as percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.admin_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn target_for(&self, service: &ServiceConfig) -> String {
        let host = self.target_host.as_deref().unwrap_or(&service.name);
        format!("{}:{}", host, service.port)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        entity: &str,
        body: Option<Value>,
    ) -> Result<Response, RegistrationError> {
        let url = self.endpoint(segments);
        tracing::debug!(method = %method, url = %url, entity, "Gateway admin request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistrationError::Rejected {
                entity: entity.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn ensure_target(&self, upstream: &str, target: &str) -> Result<(), RegistrationError> {
        let existing: TargetList = self
            .send(Method::GET, &["upstreams", upstream, "targets"], "targets", None)
            .await?
            .json()
            .await?;

        if existing.data.iter().any(|t| t.target == target) {
            tracing::debug!(upstream, target, "Target already registered");
            return Ok(());
        }

        self.send(
            Method::POST,
            &["upstreams", upstream, "targets"],
            "target",
            Some(json!({ "target": target, "weight": DEFAULT_TARGET_WEIGHT })),
        )
        .await?;
        Ok(())
    }
}

impl Registrar for KongGateway {
    async fn register(&self, service: &ServiceConfig) -> Result<(), RegistrationError> {
        let upstream = service.virtual_host.as_str();
        let target = self.target_for(service);
        let route = format!("{}-route", service.name);

        self.send(
            Method::PUT,
            &["upstreams", upstream],
            "upstream",
            Some(json!({ "name": upstream })),
        )
        .await?;

        self.ensure_target(upstream, &target).await?;

        self.send(
            Method::PUT,
            &["services", &service.name],
            "service",
            Some(json!({
                "name": service.name,
                "host": upstream,
                "port": service.port,
                "protocol": "http",
            })),
        )
        .await?;

        self.send(
            Method::PUT,
            &["services", &service.name, "routes", &route],
            "route",
            Some(json!({
                "name": route,
                "paths": [service.route_pattern],
                "strip_path": false,
            })),
        )
        .await?;

        tracing::info!(
            upstream,
            target = %target,
            service = %service.name,
            route = %route,
            paths = %service.route_pattern,
            "Registered on API gateway"
        );
        Ok(())
    }
}
