//! Observability utilities for the campus platform.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Activity-log counters for the deliberately silent code paths
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, ActivityMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics();
//!
//! // Count a skipped undo
//! ActivityMetrics::record_undo_stale("COURSE_DELETION");
//!
//! // Add metrics endpoint to router
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod activity;
pub mod middleware;

pub use activity::ActivityMetrics;
pub use middleware::metrics_middleware;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at application startup. Returns the handle used for
/// rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for the /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Activity log metrics
    describe_counter!(
        "activity_log_entries_total",
        "Activity log entries written, by event and kind"
    );
    describe_counter!(
        "activity_log_render_unknown_total",
        "Log entries listed whose event has no description template"
    );
    describe_counter!(
        "activity_log_undo_total",
        "Successful undo operations by event"
    );
    describe_counter!(
        "activity_log_undo_stale_total",
        "Undo attempts skipped because the target was no longer in the deleted state"
    );
    describe_counter!(
        "activity_log_undo_unsupported_total",
        "Undo attempts on events with no registered handler"
    );
}
