//! Types for the fetch orchestrator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::UpsertStats;

/// Errors surfaced by `refresh()`.
///
/// Per-source and per-record failures are absorbed into pass statistics;
/// only whole-pass failure reaches the caller.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// A refresh pass is already in flight. The caller must wait for it to
    /// settle and retry explicitly; passes are never queued or merged.
    #[error("a refresh pass is already in progress")]
    AlreadyInProgress,

    /// Every configured source failed; the previous snapshot is retained.
    #[error("catalog unavailable: all configured sources failed")]
    CatalogUnavailable {
        /// Failure message per source.
        sources: HashMap<String, String>,
    },
}

/// Orchestrator state, as observed between and during passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPhase {
    /// No pass has completed yet.
    Idle,
    /// A pass is in flight; reads see the previous snapshot.
    Fetching,
    /// At least one pass has settled.
    Settled,
}

/// Outcome of one settled refresh pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassOutcome {
    /// Unique id for this pass, for log correlation.
    pub pass_id: String,
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// How long the pass took in milliseconds.
    pub duration_ms: u64,
    /// Whether every configured source produced a batch.
    pub complete: bool,
    /// Items in the snapshot after deduplication.
    pub total_items: usize,
    /// Sources that produced a batch.
    pub sources_ok: Vec<String>,
    /// Sources that were unavailable this pass (name -> error message).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub sources_failed: HashMap<String, String>,
    /// Merge counts across all source batches.
    pub stats: UpsertStats,
    /// Malformed records dropped during normalization.
    pub records_dropped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_phase_serialization() {
        assert_eq!(serde_json::to_string(&RefreshPhase::Idle).unwrap(), "\"idle\"");
        assert_eq!(
            serde_json::to_string(&RefreshPhase::Fetching).unwrap(),
            "\"fetching\""
        );
        assert_eq!(
            serde_json::to_string(&RefreshPhase::Settled).unwrap(),
            "\"settled\""
        );
    }

    #[test]
    fn test_pass_outcome_skips_empty_failures() {
        let outcome = PassOutcome {
            pass_id: "pass-1".to_string(),
            started_at: Utc::now(),
            duration_ms: 42,
            complete: true,
            total_items: 10,
            sources_ok: vec!["valorant".to_string()],
            sources_failed: HashMap::new(),
            stats: UpsertStats::default(),
            records_dropped: 0,
        };

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("sources_failed"));
        assert!(json.contains("\"complete\":true"));
    }

    #[test]
    fn test_error_display() {
        let err = RefreshError::AlreadyInProgress;
        assert_eq!(err.to_string(), "a refresh pass is already in progress");

        let err = RefreshError::CatalogUnavailable {
            sources: HashMap::new(),
        };
        assert!(err.to_string().contains("all configured sources failed"));
    }
}
