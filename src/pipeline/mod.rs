// The filing scan pipeline: retrieve -> extract -> score -> filter.
//
// Each stage widens the same filing records. Everything a run needs is in
// an immutable PipelineConfig passed in by the caller.

pub mod extract;
pub mod normalize;
pub mod relevance;
pub mod retrieve;
pub mod run;
pub mod scan;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::Duration;

use crate::keywords::categories::CategorySets;

/// Immutable settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Form type to retrieve, e.g. "10-K". Its "/A" amendment is excluded.
    pub form_type: String,
    /// Item codes to extract from every filing, e.g. ["1", "1A"].
    pub items: Vec<String>,
    /// First filing year (inclusive).
    pub start_year: i32,
    /// Last filing year (inclusive).
    pub end_year: i32,
    pub categories: CategorySets,
    /// Filings processed concurrently during extraction and scoring.
    pub concurrency: usize,
    /// Upper bound on any single external call.
    pub request_timeout: Duration,
    /// When false, category terms missing from the vocabulary are appended
    /// to it before scanning. When true the vocabulary is used as loaded.
    pub strict_vocabulary: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            form_type: "10-K".to_string(),
            items: ["1", "1A", "2", "7"].iter().map(|s| s.to_string()).collect(),
            start_year: 2018,
            end_year: 2025,
            categories: CategorySets::default(),
            concurrency: 4,
            request_timeout: Duration::from_secs(60),
            strict_vocabulary: false,
        }
    }
}

/// Cooperative cancellation, checked between filings.
///
/// Setting the flag stops new filings from starting; filings already in
/// flight run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
