//! Prometheus metrics for observability.
//!
//! - HTTP request metrics (latency, counts, in flight)
//! - Generation requests by result
//! - Number of GIFs in the output directory (refreshed on scrape and listing)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "strokegif_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("strokegif_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "strokegif_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Generation Metrics
// =============================================================================

/// Generation requests by result (success, failed, rejected).
pub static GENERATE_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "strokegif_generate_requests_total",
            "Generation requests by result",
        ),
        &["result"],
    )
    .unwrap()
});

/// GIFs currently in the output directory.
pub static GENERATED_FILES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "strokegif_generated_files",
        "Number of GIFs in the output directory",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Generation
    registry
        .register(Box::new(GENERATE_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(GENERATED_FILES.clone()))
        .unwrap();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Refresh gauges derived from the filesystem.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(entries) =
        strokegif_core::list_outputs(&state.config().output.dir, crate::api::OUTPUT_URL_PREFIX)
            .await
    {
        GENERATED_FILES.set(entries.len() as i64);
    }
}

/// Collapse per-file paths so label cardinality stays bounded.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with("/output/") {
        "/output/{name}".to_string()
    } else {
        path.to_string()
    }
}
