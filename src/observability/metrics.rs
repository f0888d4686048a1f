//! Metrics collection and exposition.
//!
//! # Metrics
//! - `service_requests_total` (counter): requests by method and status
//! - `service_request_duration_seconds` (histogram): handling latency by method
//!
//! Recording is a no-op until an exporter is installed, so tests and
//! `--metrics`-less runs pay nothing.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics exporter started");
    Ok(())
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    counter!(
        "service_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("service_request_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}
