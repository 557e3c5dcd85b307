//! Lazily materialized search results.

use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::document::Document;
use crate::index::{DocId, IndexSnapshot};
use crate::query::CompiledQuery;
use crate::search::config::SearcherConfig;
use crate::search::searcher::execute;

/// A document that matched a query, with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub doc_id: DocId,
    pub doc_type: String,
    pub score: f32,
    pub document: Arc<Document>,
}

/// The ordered matches of one query execution.
///
/// Nothing is evaluated until the first accessor call; that call
/// materializes the full ordering once against the snapshot captured at
/// search time. Every later call, including repeated iteration and
/// pagination, reads the same materialized sequence.
///
/// ```
/// use examine::document::Document;
/// use examine::index::{MemoryIndex, SearchIndex};
/// use examine::search::Searcher;
/// use std::sync::Arc;
///
/// let index = Arc::new(MemoryIndex::new());
/// let docs = (0..5)
///     .map(|i| Document::builder().add_integer("id", i).build())
///     .collect();
/// index.add_documents("media", docs)?;
///
/// let searcher = Searcher::new(index);
/// let results = searcher.search(&searcher.create_criteria("media").compile()?)?;
///
/// assert_eq!(results.total_item_count(), 5);
/// assert_eq!(results.skip(2).first(), results.element_at(2));
/// # Ok::<(), examine::error::ExamineError>(())
/// ```
#[derive(Debug)]
pub struct ResultSet {
    query: CompiledQuery,
    snapshot: Arc<IndexSnapshot>,
    config: SearcherConfig,
    matches: OnceLock<Vec<ScoredMatch>>,
}

impl ResultSet {
    pub(crate) fn new(query: CompiledQuery, snapshot: Arc<IndexSnapshot>, config: SearcherConfig) -> Self {
        ResultSet {
            query,
            snapshot,
            config,
            matches: OnceLock::new(),
        }
    }

    /// The query these results answer.
    pub fn query(&self) -> &CompiledQuery {
        &self.query
    }

    /// All matches in result order.
    pub fn matches(&self) -> &[ScoredMatch] {
        self.matches
            .get_or_init(|| execute(&self.query, &self.snapshot, &self.config))
    }

    /// Number of matching documents.
    pub fn total_item_count(&self) -> usize {
        self.matches().len()
    }

    pub fn len(&self) -> usize {
        self.total_item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.matches().is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMatch> {
        self.matches().iter()
    }

    pub fn first(&self) -> Option<&ScoredMatch> {
        self.matches().first()
    }

    /// Matches after the first `n`. Skipping past the end yields an empty slice.
    pub fn skip(&self, n: usize) -> &[ScoredMatch] {
        let matches = self.matches();
        &matches[n.min(matches.len())..]
    }

    pub fn element_at(&self, index: usize) -> Option<&ScoredMatch> {
        self.matches().get(index)
    }

    /// Up to `limit` matches starting at `offset`.
    pub fn page(&self, offset: usize, limit: usize) -> &[ScoredMatch] {
        let rest = self.skip(offset);
        &rest[..limit.min(rest.len())]
    }

    /// Highest score among the matches.
    pub fn max_score(&self) -> Option<f32> {
        self.matches().iter().map(|m| m.score).reduce(f32::max)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScoredMatch;
    type IntoIter = std::slice::Iter<'a, ScoredMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
