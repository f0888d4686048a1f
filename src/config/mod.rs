//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file)
//!     → cli.rs (flags and SERVICE_* env overlay)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated)
//!     → ServiceConfig (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; there is no reload
//! - All fields have defaults so the service starts with no config at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
    ServiceSettings,
};
pub use validation::{validate_config, ValidationError};
