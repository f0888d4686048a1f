//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, single configured path)
//!     → request.rs (request ID)
//!     → dispatcher.rs (method switch, JSON codec, timing)
//!     → response.rs (envelope or plain-text reply)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::{DispatchError, Dispatcher, EchoPayload};
pub use request::X_REQUEST_ID;
pub use response::{Reply, ResponseEnvelope};
pub use server::HttpServer;
