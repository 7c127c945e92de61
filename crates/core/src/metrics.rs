//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Refresh passes (outcomes, durations)
//! - Per-source fetch results and item yields
//! - Normalization drops and dedupe collisions

use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Refresh passes total by result.
pub static REFRESH_PASSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("armory_refresh_passes_total", "Total refresh passes"),
        &["result"], // "complete", "partial", "failed", "rejected"
    )
    .unwrap()
});

/// Refresh pass duration in seconds.
pub static PASS_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "armory_refresh_pass_duration_seconds",
            "Duration of refresh passes",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

/// Source fetches total by source and result.
pub static SOURCE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("armory_source_fetches_total", "Total source fetches"),
        &["source", "result"], // result: "ok", "error"
    )
    .unwrap()
});

/// Items produced per source (after normalization).
pub static SOURCE_ITEMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "armory_source_items_total",
            "Items normalized from each source",
        ),
        &["source"],
    )
    .unwrap()
});

/// Malformed records dropped during normalization, per source.
pub static RECORDS_DROPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "armory_records_dropped_total",
            "Malformed records dropped during normalization",
        ),
        &["source"],
    )
    .unwrap()
});

/// Dedupe collisions resolved across all passes.
pub static DEDUP_COLLISIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "armory_dedup_collisions_total",
        "Dedupe collisions resolved during catalog merges",
    )
    .unwrap()
});

/// All core metrics, for registration into a server-side registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(REFRESH_PASSES.clone()),
        Box::new(PASS_DURATION.clone()),
        Box::new(SOURCE_FETCHES.clone()),
        Box::new(SOURCE_ITEMS.clone()),
        Box::new(RECORDS_DROPPED.clone()),
        Box::new(DEDUP_COLLISIONS.clone()),
    ]
}
