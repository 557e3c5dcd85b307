//! Query execution: matching, scoring, ordering and result sets.
//!
//! [`Searcher::search`] captures the index snapshot and hands back a
//! [`ResultSet`]. The first read of the result set evaluates the query tree
//! against every document the type filter admits, scores matches with
//! [`BM25Scorer`], and sorts them: by the compiled sort keys when present,
//! otherwise by descending score with insertion order breaking ties.

pub mod config;
pub mod matcher;
pub mod results;
pub mod scorer;
pub mod searcher;

pub use self::config::SearcherConfig;
pub use self::matcher::Matcher;
pub use self::results::{ResultSet, ScoredMatch};
pub use self::scorer::{BM25Scorer, TermStats};
pub use self::searcher::Searcher;
