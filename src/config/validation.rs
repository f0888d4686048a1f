//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected and reported together rather than stopping at the first.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "service.port").
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let service = &config.service;

    if service.name.trim().is_empty() {
        errors.push(ValidationError::new("service.name", "must not be empty"));
    }
    if service.port == 0 {
        errors.push(ValidationError::new("service.port", "must be between 1 and 65535"));
    }
    if !service.path.starts_with('/') {
        errors.push(ValidationError::new(
            "service.path",
            format!("must start with '/', got {:?}", service.path),
        ));
    } else if service.path.contains(['{', '}']) {
        errors.push(ValidationError::new(
            "service.path",
            "must be a literal path without '{' or '}'",
        ));
    } else if let Some(segment) = service
        .path
        .split('/')
        .find(|segment| segment.starts_with([':', '*']))
    {
        errors.push(ValidationError::new(
            "service.path",
            format!("segment {:?} must not start with ':' or '*'", segment),
        ));
    }
    if service.domain.trim().is_empty() {
        errors.push(ValidationError::new("service.domain", "must not be empty"));
    }

    if !config.gateway.skip_registration {
        match Url::parse(&config.gateway.admin_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "gateway.admin_url",
                format!("unsupported scheme {:?}", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("gateway.admin_url", e.to_string())),
        }
        if config.gateway.timeout_secs == 0 {
            errors.push(ValidationError::new("gateway.timeout_secs", "must be greater than 0"));
        }
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {:?}", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
