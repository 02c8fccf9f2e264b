//! Metrics collection and exposition.
//!
//! # Metrics
//! - `crossbar_requests_total` (counter): dispatched requests by method, status
//! - `crossbar_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Metric updates are cheap atomic operations via the `metrics` facade
//! - Exposition is optional; without the exporter installed the macros are
//!   no-ops

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address. Must run inside
/// the Tokio runtime; failures are logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "failed to install metrics exporter"),
    }
}

/// Record one completed dispatch.
pub fn record_dispatch(method: &str, status: u16, started: Instant) {
    metrics::counter!(
        "crossbar_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "crossbar_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}
