//! Query execution.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::document::Document;
use crate::error::Result;
use crate::index::{IndexSnapshot, IndexedDocument, SearchIndex};
use crate::query::value::wildcard;
use crate::query::{
    BooleanOperation, CompiledQuery, Criteria, SearchValue, SortField, SortOrder, TypeFilter,
};
use crate::search::config::SearcherConfig;
use crate::search::matcher::Matcher;
use crate::search::results::{ResultSet, ScoredMatch};
use crate::search::scorer::BM25Scorer;

/// Executes compiled queries against a [`SearchIndex`].
///
/// A searcher holds no per-query state, so one instance can serve
/// concurrent searches from many threads.
#[derive(Debug, Clone)]
pub struct Searcher {
    index: Arc<dyn SearchIndex>,
    config: SearcherConfig,
}

impl Searcher {
    /// Create a searcher with the default configuration.
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self::with_config(index, SearcherConfig::default())
    }

    pub fn with_config(index: Arc<dyn SearchIndex>, config: SearcherConfig) -> Self {
        Searcher { index, config }
    }

    pub fn config(&self) -> &SearcherConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<dyn SearchIndex> {
        &self.index
    }

    /// Start a criteria over `type_filter` whose clauses default to AND.
    pub fn create_criteria(&self, type_filter: impl Into<TypeFilter>) -> Criteria {
        self.create_criteria_with(type_filter, BooleanOperation::And)
    }

    /// Start a criteria over `type_filter` with the given default operation.
    ///
    /// Values are analyzed with the index's own analyzers.
    pub fn create_criteria_with(
        &self,
        type_filter: impl Into<TypeFilter>,
        default_operation: BooleanOperation,
    ) -> Criteria {
        Criteria::with_analyzer(type_filter.into(), default_operation, self.index.analyzer())
    }

    /// Execute `query` against the index's current snapshot.
    ///
    /// The snapshot is captured here; scoring happens when the returned
    /// [`ResultSet`] is first read.
    pub fn search(&self, query: &CompiledQuery) -> Result<ResultSet> {
        let snapshot = self.index.snapshot()?;
        debug!("searching {} document(s) for: {query}", snapshot.len());
        Ok(ResultSet::new(query.clone(), snapshot, self.config.clone()))
    }

    /// Search every field for each whitespace-separated word of `text`,
    /// matching documents that contain any of them.
    pub fn search_text(
        &self,
        type_filter: impl Into<TypeFilter>,
        text: &str,
        use_wildcards: bool,
    ) -> Result<ResultSet> {
        let mut criteria = self.create_criteria_with(type_filter, BooleanOperation::Or);
        for word in text.split_whitespace() {
            let value = if use_wildcards {
                wildcard(word)
            } else {
                SearchValue::from(word)
            };
            criteria = criteria.any_field(value)?;
        }
        self.search(&criteria.compile()?)
    }
}

/// Evaluate `query` over `snapshot` and order the matches.
pub(crate) fn execute(
    query: &CompiledQuery,
    snapshot: &IndexSnapshot,
    config: &SearcherConfig,
) -> Vec<ScoredMatch> {
    let filter = query.type_filter();
    let candidates: Vec<&Arc<IndexedDocument>> = snapshot
        .documents()
        .filter(|d| filter.admits(d.doc_type()))
        .collect();

    let mut matches: Vec<ScoredMatch> = match query.root() {
        None if *filter == TypeFilter::All => {
            debug!("empty query over all types, returning no results");
            Vec::new()
        }
        None => {
            debug!("empty query, returning every {filter} document");
            candidates.iter().map(|d| scored(d, 1.0)).collect()
        }
        Some(root) => {
            for field in query.fields() {
                if !snapshot.has_field(field) {
                    debug!("unknown field {field:?} matches nothing");
                }
            }

            let scorer = BM25Scorer::new(config.k1, config.b);
            let matcher = Matcher::new(snapshot, &scorer, config.max_fuzzy_edits);
            let score = |d: &&Arc<IndexedDocument>| matcher.evaluate(root, d).map(|s| scored(d, s));

            if config.parallel && candidates.len() >= config.parallel_threshold {
                candidates.par_iter().filter_map(score).collect()
            } else {
                candidates.iter().filter_map(score).collect()
            }
        }
    };

    sort_matches(&mut matches, query.sort_fields());
    debug!(
        "{} of {} candidate(s) matched",
        matches.len(),
        candidates.len()
    );
    matches
}

fn scored(document: &IndexedDocument, score: f32) -> ScoredMatch {
    ScoredMatch {
        doc_id: document.doc_id(),
        doc_type: document.doc_type().to_string(),
        score,
        document: Arc::clone(document.document()),
    }
}

/// Order by sort keys if given, else by descending score. Both sorts are
/// stable over insertion order, so ties never reorder between calls.
fn sort_matches(matches: &mut [ScoredMatch], sort_fields: &[SortField]) {
    if sort_fields.is_empty() {
        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
    } else {
        matches.sort_by(|a, b| compare_by_fields(&a.document, &b.document, sort_fields));
    }
}

/// Documents missing a sort field go last whichever the direction.
fn compare_by_fields(a: &Document, b: &Document, sort_fields: &[SortField]) -> Ordering {
    for key in sort_fields {
        let ordering = match (a.get_field(&key.name), b.get_field(&key.name)) {
            (Some(x), Some(y)) => match key.order {
                SortOrder::Asc => x.sort_cmp(y),
                SortOrder::Desc => y.sort_cmp(x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn searcher(docs: Vec<(&str, Document)>) -> Searcher {
        let index = MemoryIndex::new();
        for (doc_type, doc) in docs {
            index.add_documents(doc_type, vec![doc]).unwrap();
        }
        Searcher::new(Arc::new(index))
    }

    fn named(name: &str, rank: i64) -> Document {
        Document::builder()
            .add_text("name", name)
            .add_integer("rank", rank)
            .build()
    }

    #[test]
    fn test_missing_sort_values_go_last_both_ways() {
        let docs = vec![
            ("content", Document::builder().add_text("name", "x").build()),
            ("content", named("b", 2)),
            ("content", named("a", 1)),
        ];
        let searcher = searcher(docs);

        let asc = searcher
            .search(&searcher.create_criteria("content").order_by("rank").compile().unwrap())
            .unwrap();
        let ranks: Vec<_> = asc.iter().map(|m| m.doc_id).collect();
        assert_eq!(ranks, vec![2, 1, 0]);

        let desc = searcher
            .search(
                &searcher
                    .create_criteria("content")
                    .order_by_descending("rank")
                    .compile()
                    .unwrap(),
            )
            .unwrap();
        let ranks: Vec<_> = desc.iter().map(|m| m.doc_id).collect();
        assert_eq!(ranks, vec![1, 2, 0]);
    }

    #[test]
    fn test_parallel_evaluation_preserves_order() {
        let docs = (0..50)
            .map(|i| ("content", named(if i % 2 == 0 { "even" } else { "odd" }, i)))
            .collect();
        let index = searcher(docs).index().clone();

        let query = Criteria::with_analyzer(
            TypeFilter::from("content"),
            BooleanOperation::And,
            index.analyzer(),
        )
        .node_name("even")
        .unwrap()
        .compile()
        .unwrap();

        let serial = Searcher::with_config(
            Arc::clone(&index),
            SearcherConfig {
                parallel: false,
                ..Default::default()
            },
        );
        let parallel = Searcher::with_config(
            index,
            SearcherConfig {
                parallel_threshold: 1,
                ..Default::default()
            },
        );

        let a = serial.search(&query).unwrap();
        let b = parallel.search(&query).unwrap();
        assert_eq!(a.total_item_count(), 25);
        assert_eq!(a.matches(), b.matches());
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let searcher = searcher(vec![("content", named("home", 1))]);
        let query = searcher
            .create_criteria("content")
            .field("noSuchField", "home")
            .unwrap()
            .compile()
            .unwrap();
        assert!(searcher.search(&query).unwrap().is_empty());
    }

    #[test]
    fn test_search_text_matches_any_word() {
        let searcher = searcher(vec![
            ("content", named("home page", 1)),
            ("content", named("about us", 2)),
            ("content", named("contact", 3)),
        ]);

        let results = searcher.search_text("content", "home about", false).unwrap();
        assert_eq!(results.total_item_count(), 2);

        let results = searcher.search_text("content", "cont", true).unwrap();
        assert_eq!(results.total_item_count(), 1);

        let results = searcher.search_text(TypeFilter::All, "", false).unwrap();
        assert!(results.is_empty());
    }
}
