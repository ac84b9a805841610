//! Metrics collection and exposition.
//!
//! # Metrics
//! - `counter_requests_total` (counter): handled requests by status
//! - `counter_blocked_total` (counter): scanner paths redirected by the blocklist
//! - `counter_store_duration_seconds` (histogram): store increment latency
//!
//! Recording is a no-op until an exporter is installed.

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(status: StatusCode) {
    metrics::counter!("counter_requests_total", "status" => status.as_str().to_owned()).increment(1);
}

pub fn record_blocked() {
    metrics::counter!("counter_blocked_total").increment(1);
}

pub fn record_store_latency(start: Instant) {
    metrics::histogram!("counter_store_duration_seconds").record(start.elapsed().as_secs_f64());
}
