//! # Examine
//!
//! A fluent search-criteria API and query engine over typed documents.
//!
//! ## Features
//!
//! - Fluent criteria builder validated call by call
//! - Wildcard, fuzzy, proximity, boosted and escaped values
//! - Deterministic compilation into an immutable query tree
//! - BM25 scoring with stable ordering and multi-key sorts
//! - Lazy, idempotent result sets
//! - Pluggable text analysis and document store
//!
//! ```
//! use std::sync::Arc;
//!
//! use examine::prelude::*;
//!
//! let index = Arc::new(MemoryIndex::new());
//! index.add_documents(
//!     "content",
//!     vec![
//!         Document::builder().add_text("name", "Home").build(),
//!         Document::builder().add_text("name", "About us").build(),
//!     ],
//! )?;
//!
//! let searcher = Searcher::new(index);
//! let query = searcher
//!     .create_criteria_with("content", BooleanOperation::Or)
//!     .node_name("home")?
//!     .or()?
//!     .node_name(wildcard("ab"))?
//!     .compile()?;
//!
//! let results = searcher.search(&query)?;
//! assert_eq!(results.total_item_count(), 2);
//! # Ok::<(), examine::error::ExamineError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod search;
pub mod util;

pub mod prelude {
    pub use crate::document::{Document, FieldValue};
    pub use crate::error::{ErrorKind, ExamineError, Result};
    pub use crate::index::{MemoryIndex, SearchIndex};
    pub use crate::query::value::{
        boost, escape, fuzzy, proximity, single_character_wildcard, wildcard,
    };
    pub use crate::query::{
        BooleanOperation, CompiledQuery, Criteria, SearchValue, SortField, TypeFilter,
    };
    pub use crate::search::{ResultSet, ScoredMatch, Searcher};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
