//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed requests by method, reply status
//! - `relay_request_duration_seconds` (histogram): end-to-end relay latency
//!
//! # Design Decisions
//! - Updates are cheap atomic operations; recording without an installed
//!   exporter is a no-op, so tests and library users pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on the given address.
///
/// Failure to start is logged and otherwise ignored; the relay keeps
/// serving without metrics.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(address).install() {
        Ok(()) => tracing::info!(address = %address, "metrics exporter listening"),
        Err(error) => {
            tracing::error!(address = %address, error = %error, "failed to start metrics exporter")
        }
    }
}

/// Record one relayed request.
pub fn record_relay(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
