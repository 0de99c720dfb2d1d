//! Prometheus metrics for the BookSwap services.
//!
//! - recorder installation and the `/metrics` handler
//! - HTTP request metrics middleware
//! - [`SwapMetrics`] for item upserts and swaps
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, SwapMetrics, SwapOutcome};
//!
//! init_metrics()?;
//! SwapMetrics::record_swap("book", SwapOutcome::Swapped, elapsed);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod swaps;

pub use middleware::metrics_middleware;
pub use swaps::{SwapMetrics, SwapOutcome};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder. Later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `GET /metrics` in the Prometheus text format.
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP requests answered with 4xx or 5xx"
    );

    describe_counter!("item_swaps_total", "Swap attempts by item kind and outcome");
    describe_histogram!(
        "item_swap_duration_seconds",
        "Swap duration including the posting call"
    );
    describe_counter!(
        "item_upserts_total",
        "Item upserts by kind and whether a new item was created"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_init_metrics_is_idempotent_and_renders_swaps() {
        let first = init_metrics().unwrap() as *const PrometheusHandle;
        let second = init_metrics().unwrap() as *const PrometheusHandle;
        assert_eq!(first, second);

        SwapMetrics::record_swap("book", SwapOutcome::Swapped, Duration::from_millis(3));
        SwapMetrics::record_upsert("magazine", true);

        let rendered = metrics_handler().await;
        assert!(rendered.contains("item_swaps_total"));
        assert!(rendered.contains("outcome=\"swapped\""));
        assert!(rendered.contains("item_upserts_total"));
    }
}
