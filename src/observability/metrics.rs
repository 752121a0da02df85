//! Metrics collection and exposition.
//!
//! # Metrics
//! - `topdf_requests_total` (counter): requests by route, status
//! - `topdf_request_duration_seconds` (histogram): latency by route
//! - `topdf_rate_limited_total` (counter): requests rejected with 429
//! - `topdf_rate_limit_tracked_clients` (gauge): identities with a live window
//! - `topdf_render_total` (counter): engine jobs by outcome
//! - `topdf_render_duration_seconds` (histogram): engine job latency
//! - `topdf_render_bytes` (histogram): produced document size

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("topdf_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    histogram!("topdf_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("topdf_rate_limited_total").increment(1);
}

pub fn record_tracked_clients(count: usize) {
    gauge!("topdf_rate_limit_tracked_clients").set(count as f64);
}

pub fn record_render(outcome: &'static str, start: Instant, bytes: usize) {
    counter!("topdf_render_total", "outcome" => outcome).increment(1);
    histogram!("topdf_render_duration_seconds").record(start.elapsed().as_secs_f64());
    if bytes > 0 {
        histogram!("topdf_render_bytes").record(bytes as f64);
    }
}
