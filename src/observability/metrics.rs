//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fleet_proxy_requests_total` (counter): proxied requests by method, status
//! - `fleet_proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `fleet_proxy_upstream_errors_total` (counter): transport failures
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one proxied request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "fleet_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "fleet_proxy_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a transport failure to the upstream.
pub fn record_upstream_error(method: &str) {
    counter!("fleet_proxy_upstream_errors_total", "method" => method.to_string()).increment(1);
}
