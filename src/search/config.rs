//! Searcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for query execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherConfig {
    /// BM25 term-frequency saturation.
    pub k1: f32,
    /// BM25 length normalization.
    pub b: f32,
    /// Enable parallel evaluation for large document sets.
    pub parallel: bool,
    /// Candidate count from which evaluation fans out across threads.
    pub parallel_threshold: usize,
    /// Upper bound on the edit distance of fuzzy values.
    pub max_fuzzy_edits: u32,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        SearcherConfig {
            k1: 1.2,
            b: 0.75,
            parallel: true,
            parallel_threshold: 10_000,
            max_fuzzy_edits: 2,
        }
    }
}
