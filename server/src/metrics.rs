//! Prometheus metrics.
//!
//! Counters and histograms are recorded through the `metrics` facade across
//! the workspace; this module installs the exporter that renders them.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Latency buckets in seconds
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Metrics setup errors
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Exporter configuration was rejected
    #[error("failed to build metrics exporter: {0}")]
    Build(String),

    /// A global recorder is already installed
    #[error("failed to install metrics recorder: {0}")]
    Install(String),
}

/// Installs the global Prometheus recorder and returns its render handle.
///
/// # Errors
///
/// Returns [`MetricsError`] if the exporter cannot be built or a recorder is
/// already installed in this process.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe();
    Ok(handle)
}

fn describe() {
    describe_counter!("http.requests.total", "HTTP requests served");
    describe_histogram!(
        "http.request.duration_seconds",
        Unit::Seconds,
        "HTTP request latency"
    );
    describe_counter!("todos.created", "Todos created");
    describe_counter!("todos.updated", "Todos updated");
    describe_counter!("todos.deleted", "Todos deleted");
}
