//! Metrics collection and exposition.
//!
//! # Metrics
//! - `petstore_requests_total` (counter): requests by operation, status
//! - `petstore_request_duration_seconds` (histogram): latency by operation
//! - `petstore_routes_mounted` (gauge): routes in the active router
//!
//! # Design Decisions
//! - Labels use the operation id (`getPetById`), never the raw path
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "petstore_requests_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "petstore_request_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish the number of mounted routes.
pub fn record_routes_mounted(count: usize) {
    metrics::gauge!("petstore_routes_mounted").set(count as f64);
}
