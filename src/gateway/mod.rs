//! API gateway self-registration.
//!
//! # Data Flow
//! ```text
//! startup
//!     → Registrar::register(&ServiceConfig)   (once, before the listener opens)
//!         → kong.rs: upstream → target → service → route
//!     → Ok: start serving / Err: abort startup
//! ```
//!
//! # Design Decisions
//! - Every admin call is an upsert, so re-registering a restarted instance is safe
//! - No retries; a failed registration is fatal to startup

pub mod kong;

use std::future::Future;

use thiserror::Error;

use crate::config::ServiceConfig;

pub use kong::KongGateway;

/// Errors raised while registering on the gateway.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The configured admin URL cannot be used as a base URL.
    #[error("invalid gateway admin URL {url:?}: {reason}")]
    InvalidAdminUrl { url: String, reason: String },

    /// The admin API could not be reached or its reply could not be read.
    #[error("gateway admin API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The admin API answered with a non-success status.
    #[error("gateway rejected {entity}: {status} {body}")]
    Rejected {
        entity: String,
        status: u16,
        body: String,
    },
}

/// Announces a service to an API gateway.
pub trait Registrar {
    /// Register (or re-register) `service`. Idempotent.
    fn register(
        &self,
        service: &ServiceConfig,
    ) -> impl Future<Output = Result<(), RegistrationError>> + Send;
}
