//! Example microservice.
//!
//! Registers itself on an API gateway at startup, then serves a single
//! configured path:
//!
//! ```text
//!                ┌──────────────────────────────────────────────┐
//!  startup       │  config ──▶ gateway registrar ──▶ Kong admin │
//!                │     │                                        │
//!                │     ▼                                        │
//!  Client ──────▶│  http server ──▶ dispatcher ──▶ reply        │
//!                │                      │                       │
//!                │                      ▼                       │
//!                │            observability (timing, logs)      │
//!                └──────────────────────────────────────────────┘
//! ```
//!
//! `GET` answers with a greeting, `POST`/`PUT`/`PATCH` echo the JSON object
//! they were sent, everything else gets a 405.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, ServiceConfig};
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
