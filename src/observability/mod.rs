//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → timing.rs (one TimingRecord per request)
//!     → LogSink
//!         → logging.rs (structured log line)
//!         → metrics.rs (counter + latency histogram)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into every timing record
//! - Metrics exporter is opt-in

pub mod logging;
pub mod metrics;
pub mod timing;

pub use timing::{LogSink, Stopwatch, TimingRecord, TimingSink};
