//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (requests, upstream latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_requests_total` (counter): caller-facing responses by status
//! - `relay_request_duration_seconds` (histogram): caller-facing latency
//! - `relay_upstream_requests_total` (counter): upstream replies by status ("error" on transport failure)
//! - `relay_upstream_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so tests need no setup

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a response returned to the caller.
pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("relay_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an upstream exchange. `None` means no status was received.
pub fn record_upstream(status: Option<u16>, start: Instant) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
    metrics::counter!("relay_upstream_requests_total", "status" => status).increment(1);
    metrics::histogram!("relay_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
