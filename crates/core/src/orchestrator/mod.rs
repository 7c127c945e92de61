//! Refresh pass orchestration.
//!
//! One pass fans out to every configured source adapter concurrently,
//! tolerates partial failure, and swaps the settled catalog snapshot in
//! atomically. Re-entrant refreshes are rejected, never queued.

mod runner;
mod types;

pub use runner::FetchOrchestrator;
pub use types::{PassOutcome, RefreshError, RefreshPhase};
