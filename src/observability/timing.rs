//! Per-request timing records.
//!
//! Every dispatch produces exactly one [`TimingRecord`], whichever branch it
//! took. Records go to a [`TimingSink`]; the production sink writes a log line
//! and updates the request metrics.

use std::time::{Duration, Instant};

use crate::observability::metrics;

/// Elapsed handling time of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    /// Request target (path and query) as received.
    pub url: String,
    /// Method token, for metric labels.
    pub method: String,
    /// Response status code.
    pub status: u16,
    /// Value of `x-request-id`, when the request carried one.
    pub request_id: Option<String>,
    /// Handling time in microseconds.
    pub elapsed_micros: f64,
}

/// Consumer of timing records.
pub trait TimingSink: Send + Sync {
    fn record(&self, record: TimingRecord);
}

/// Sink that logs each record and feeds the request metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TimingSink for LogSink {
    fn record(&self, record: TimingRecord) {
        tracing::info!(
            url = %record.url,
            request_id = record.request_id.as_deref().unwrap_or("unknown"),
            status = record.status,
            elapsed_us = record.elapsed_micros,
            "Req {} handled in {:.2}μs.",
            record.url,
            record.elapsed_micros
        );
        metrics::record_request(
            &record.method,
            record.status,
            Duration::from_secs_f64(record.elapsed_micros / 1_000_000.0),
        );
    }
}

/// Monotonic stopwatch started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since start, in fractional microseconds.
    pub fn elapsed_micros(&self) -> f64 {
        self.start.elapsed().as_nanos() as f64 / 1000.0
    }
}
