//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the armory server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - Catalog gauges (collected dynamically from the last-settled snapshot)
//! - Core pass/source metrics registered from `armory-core`

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
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
            "armory_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("armory_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "armory_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Items in the last-settled catalog snapshot.
pub static CATALOG_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "armory_catalog_items",
        "Items in the last-settled catalog snapshot",
    )
    .unwrap()
});

/// Sources configured for aggregation passes.
pub static CATALOG_SOURCES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "armory_catalog_sources",
        "Source adapters configured for aggregation passes",
    )
    .unwrap()
});

/// Sources unavailable in the most recent settled pass.
pub static CATALOG_SOURCES_UNAVAILABLE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "armory_catalog_sources_unavailable",
        "Sources unavailable in the most recent settled pass",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    registry.register(Box::new(CATALOG_ITEMS.clone())).unwrap();
    registry.register(Box::new(CATALOG_SOURCES.clone())).unwrap();
    registry
        .register(Box::new(CATALOG_SOURCES_UNAVAILABLE.clone()))
        .unwrap();

    // Core metrics (passes, source fetches, normalization)
    for metric in armory_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding to update gauges with values from the
/// orchestrator's last-settled snapshot.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let orchestrator = state.orchestrator();

    CATALOG_SOURCES.set(orchestrator.source_names().len() as i64);
    CATALOG_ITEMS.set(orchestrator.snapshot().await.len() as i64);

    let unavailable = orchestrator
        .last_pass()
        .await
        .map(|pass| pass.sources_failed.len())
        .unwrap_or(0);
    CATALOG_SOURCES_UNAVAILABLE.set(unavailable as i64);
}

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    // Item ids come from upstream APIs: UUIDs, numeric ids, or slugs under
    // a known prefix.
    let uuid_regex = regex_lite::Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .unwrap();
    let numeric_regex = regex_lite::Regex::new(r"/\d+(/|$)").unwrap();
    let item_regex = regex_lite::Regex::new(r"(/catalog/[^/]+)/[^/]+$").unwrap();

    let result = uuid_regex.replace_all(path, "{id}");
    let result = numeric_regex.replace_all(&result, "/{id}$1");
    let result = item_regex.replace_all(&result, "$1/{id}");
    result.to_string()
}
