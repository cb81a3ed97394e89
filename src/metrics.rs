//! Prometheus metrics for request counting and latency tracking.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Sums computed counter metric name.
pub const METRIC_SUMS_COMPUTED: &str = "sums_computed_total";
/// Rejected sum parameters counter metric name.
pub const METRIC_SUM_VALIDATION_FAILURES: &str = "sum_validation_failures_total";

/// Label used for requests that matched no route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Install the global Prometheus recorder and describe all metrics.
///
/// Call this once at startup; a second call fails because a recorder is
/// already installed.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// A render handle that is not connected to the global recorder.
///
/// Used where a handle is required but nothing should be exported, e.g. in
/// router tests.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

fn describe_metrics() {
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests by route, method and status"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_SUMS_COMPUTED, "Total number of sums computed");
    describe_counter!(
        METRIC_SUM_VALIDATION_FAILURES,
        "Total number of rejected sum parameters by field"
    );

    debug!("Metrics initialized");
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, route: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "route" => route.to_string()).record(latency_ms);
}

/// Increment the sums computed counter.
pub fn inc_sums_computed() {
    counter!(METRIC_SUMS_COMPUTED).increment(1);
}

/// Increment the validation failure counter for one field.
pub fn inc_sum_validation_failure(field: &str) {
    counter!(METRIC_SUM_VALIDATION_FAILURES, "field" => field.to_string()).increment(1);
}

/// Middleware counting every request and timing it.
///
/// Routes are labelled by their matched pattern so unknown paths cannot
/// blow up label cardinality.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
    let method = req.method().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        METRIC_HTTP_REQUESTS,
        "route" => route.clone(),
        "method" => method,
        "status" => status
    )
    .increment(1);
    record_http_latency(start, &route);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_handle_renders_without_global_recorder() {
        let handle = detached_handle();
        inc_sums_computed();
        // Nothing is registered with a detached recorder.
        assert!(!handle.render().contains(METRIC_SUMS_COMPUTED));
    }

    #[test]
    fn recording_without_recorder_is_a_noop() {
        let start = Instant::now();
        record_http_latency(start, "/sum");
        inc_sum_validation_failure("a");
    }
}
