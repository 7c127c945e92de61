//! Fetch orchestrator implementation.
//!
//! Drives one aggregation pass at a time: fan-out to every configured
//! source adapter, fan-in once all have resolved, then swap the settled
//! snapshot in atomically. A single source's failure never cancels its
//! siblings; only a pass where every source fails is surfaced to the
//! caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogIndex, Item, UpsertStats};
use crate::metrics;
use crate::normalize::normalize_batch;
use crate::source::{SourceAdapter, SourceUnavailable};

use super::types::{PassOutcome, RefreshError, RefreshPhase};

/// Items and drop count yielded by one source for one pass.
struct SourceYield {
    items: Vec<Item>,
    dropped: usize,
}

/// The fetch orchestrator: owns the configured sources and the last-settled
/// catalog snapshot.
pub struct FetchOrchestrator {
    sources: Vec<Arc<dyn SourceAdapter>>,
    fetching: AtomicBool,
    snapshot: RwLock<Arc<CatalogIndex>>,
    last_pass: RwLock<Option<PassOutcome>>,
}

impl FetchOrchestrator {
    /// Create a new orchestrator over the given sources. The catalog starts
    /// empty until the first pass settles.
    pub fn new(sources: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            sources,
            fetching: AtomicBool::new(false),
            snapshot: RwLock::new(Arc::new(CatalogIndex::new())),
            last_pass: RwLock::new(None),
        }
    }

    /// Names of the configured sources.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// The last-settled catalog snapshot.
    ///
    /// Reads during an in-flight pass see the previous complete snapshot;
    /// the working set is never exposed until the pass settles.
    pub async fn snapshot(&self) -> Arc<CatalogIndex> {
        self.snapshot.read().await.clone()
    }

    /// Current orchestrator phase.
    pub async fn phase(&self) -> RefreshPhase {
        if self.fetching.load(Ordering::SeqCst) {
            return RefreshPhase::Fetching;
        }
        if self.last_pass.read().await.is_some() {
            RefreshPhase::Settled
        } else {
            RefreshPhase::Idle
        }
    }

    /// Outcome of the most recent settled pass, if any.
    pub async fn last_pass(&self) -> Option<PassOutcome> {
        self.last_pass.read().await.clone()
    }

    /// Run one aggregation pass.
    ///
    /// Rejected with [`RefreshError::AlreadyInProgress`] while a pass is in
    /// flight; concurrent catalog builds are never started.
    pub async fn refresh(&self) -> Result<PassOutcome, RefreshError> {
        if self.fetching.swap(true, Ordering::SeqCst) {
            metrics::REFRESH_PASSES.with_label_values(&["rejected"]).inc();
            return Err(RefreshError::AlreadyInProgress);
        }

        let result = self.run_pass().await;
        self.fetching.store(false, Ordering::SeqCst);
        result
    }

    async fn run_pass(&self) -> Result<PassOutcome, RefreshError> {
        let start = Instant::now();
        let started_at = Utc::now();
        let pass_id = uuid::Uuid::new_v4().to_string();

        debug!(
            pass_id = %pass_id,
            sources = self.sources.len(),
            "Starting refresh pass"
        );

        // Fan-out: every source fetches concurrently. Fan-in: the pass
        // settles only once each has produced a batch or failed.
        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            async move {
                let result = Self::fetch_source(source.as_ref()).await;
                (source, result)
            }
        });
        let results = join_all(fetches).await;

        let mut index = CatalogIndex::new();
        let mut stats = UpsertStats::default();
        let mut records_dropped = 0;
        let mut sources_ok = Vec::new();
        let mut sources_failed: HashMap<String, String> = HashMap::new();

        for (source, result) in results {
            let name = source.name().to_string();
            match result {
                Ok(yielded) => {
                    metrics::SOURCE_FETCHES.with_label_values(&[&name, "ok"]).inc();
                    metrics::SOURCE_ITEMS
                        .with_label_values(&[&name])
                        .inc_by(yielded.items.len() as u64);
                    if yielded.dropped > 0 {
                        metrics::RECORDS_DROPPED
                            .with_label_values(&[&name])
                            .inc_by(yielded.dropped as u64);
                    }
                    records_dropped += yielded.dropped;

                    let batch_stats = index.upsert_batch(yielded.items, source.precedence());
                    let collisions = batch_stats.updated + batch_stats.dropped;
                    if collisions > 0 {
                        metrics::DEDUP_COLLISIONS.inc_by(collisions as u64);
                    }
                    stats.absorb(batch_stats);
                    sources_ok.push(name);
                }
                Err(unavailable) => {
                    warn!(
                        source = %unavailable.name,
                        error = %unavailable.cause,
                        "Source fetch failed"
                    );
                    metrics::SOURCE_FETCHES
                        .with_label_values(&[&name, "error"])
                        .inc();
                    sources_failed.insert(unavailable.name, unavailable.cause.to_string());
                }
            }
        }

        let duration = start.elapsed();

        if sources_ok.is_empty() {
            metrics::REFRESH_PASSES.with_label_values(&["failed"]).inc();
            metrics::PASS_DURATION
                .with_label_values(&["failed"])
                .observe(duration.as_secs_f64());
            warn!(
                pass_id = %pass_id,
                failed = sources_failed.len(),
                "Refresh pass failed, retaining previous snapshot"
            );
            return Err(RefreshError::CatalogUnavailable {
                sources: sources_failed,
            });
        }

        let complete = sources_failed.is_empty();
        let result_label = if complete { "complete" } else { "partial" };
        metrics::REFRESH_PASSES.with_label_values(&[result_label]).inc();
        metrics::PASS_DURATION
            .with_label_values(&[result_label])
            .observe(duration.as_secs_f64());

        let outcome = PassOutcome {
            pass_id: pass_id.clone(),
            started_at,
            duration_ms: duration.as_millis() as u64,
            complete,
            total_items: index.len(),
            sources_ok,
            sources_failed,
            stats,
            records_dropped,
        };

        info!(
            pass_id = %pass_id,
            items = outcome.total_items,
            sources_ok = outcome.sources_ok.len(),
            sources_failed = outcome.sources_failed.len(),
            duration_ms = outcome.duration_ms,
            "Refresh pass settled"
        );

        // Swap the new snapshot in atomically: readers either see the old
        // complete catalog or the new one, never a partial merge.
        *self.snapshot.write().await = Arc::new(index);
        *self.last_pass.write().await = Some(outcome.clone());

        Ok(outcome)
    }

    /// Fetch and normalize one source. Failures carry the source name so
    /// the pass can report which sources were unavailable.
    async fn fetch_source(source: &dyn SourceAdapter) -> Result<SourceYield, SourceUnavailable> {
        let batches = source.fetch().await.map_err(|cause| SourceUnavailable {
            name: source.name().to_string(),
            cause,
        })?;

        let mut items = Vec::new();
        let mut dropped = 0;
        for batch in &batches {
            let normalized = normalize_batch(source, batch);
            items.extend(normalized.items);
            dropped += normalized.dropped;
        }

        debug!(
            source = source.name(),
            items = items.len(),
            dropped = dropped,
            "Source fetch complete"
        );

        Ok(SourceYield { items, dropped })
    }
}
