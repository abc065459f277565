//! Prometheus metrics for request and store monitoring.
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Metric names exported by the service.
pub mod names {
    /// Request latency by route template and method.
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    /// Requests by route template, method and status code.
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    /// Open store connections.
    pub const DATABASE_CONNECTIONS_ACTIVE: &str = "database_connections_active";
    /// Records held by the user cache.
    pub const CACHE_ENTRIES_TOTAL: &str = "cache_entries_total";
}

/// Installs the global Prometheus recorder and describes every metric.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "Duration of HTTP requests."
    );
    describe_counter!(names::HTTP_REQUESTS_TOTAL, "Count of HTTP requests.");
    describe_gauge!(
        names::DATABASE_CONNECTIONS_ACTIVE,
        "Number of active database connections."
    );
    describe_gauge!(names::CACHE_ENTRIES_TOTAL, "Number of entries in cache.");
}

/// Request metrics recorder.
pub struct RequestMetrics;

impl RequestMetrics {
    /// Record one completed request.
    pub fn observe(path: &str, method: &str, status: u16, duration: Duration) {
        histogram!(
            names::HTTP_REQUEST_DURATION_SECONDS,
            "path" => path.to_string(),
            "method" => method.to_string()
        )
        .record(duration.as_secs_f64());

        counter!(
            names::HTTP_REQUESTS_TOTAL,
            "path" => path.to_string(),
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
    }
}

/// Health gauges recorder.
pub struct HealthMetrics;

impl HealthMetrics {
    pub fn set_active_connections(count: u32) {
        gauge!(names::DATABASE_CONNECTIONS_ACTIVE).set(f64::from(count));
    }

    pub fn set_cache_entries(count: usize) {
        gauge!(names::CACHE_ENTRIES_TOTAL).set(count as f64);
    }
}
