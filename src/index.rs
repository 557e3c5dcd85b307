//! The document store queries run against.
//!
//! The query core only needs two things from an index: a way to add
//! documents tagged with a type, and a consistent [`IndexSnapshot`] to
//! evaluate a compiled query over. [`SearchIndex`] captures exactly that;
//! [`MemoryIndex`] is the in-process implementation.

pub mod config;
pub mod memory;
pub mod snapshot;

use std::fmt::Debug;
use std::sync::Arc;

use crate::analysis::PerFieldAnalyzer;
use crate::document::Document;
use crate::error::Result;
use crate::query::TypeFilter;

pub use self::config::{AnalyzerKind, IndexConfig};
pub use self::memory::MemoryIndex;
pub use self::snapshot::{FieldStats, IndexSnapshot, IndexedDocument, IndexedField, Segment};

/// Identifier assigned to a document when it is added. Ids grow with
/// insertion order and are never reused.
pub type DocId = u64;

/// Trait for document stores a [`Searcher`](crate::search::Searcher) can query.
pub trait SearchIndex: Send + Sync + Debug {
    /// Add documents under `doc_type`, returning their ids in order.
    fn add_documents(&self, doc_type: &str, documents: Vec<Document>) -> Result<Vec<DocId>>;

    /// Drop every document of `doc_type`, then add `documents` under it.
    fn replace_documents(&self, doc_type: &str, documents: Vec<Document>) -> Result<Vec<DocId>>;

    /// Drop every document of `doc_type`, returning how many were removed.
    fn delete_type(&self, doc_type: &str) -> Result<usize>;

    /// Count the documents admitted by `filter`.
    fn doc_count(&self, filter: &TypeFilter) -> Result<usize>;

    /// The current document set. Later writes never change a snapshot
    /// that has already been handed out.
    fn snapshot(&self) -> Result<Arc<IndexSnapshot>>;

    /// The analyzers fields are indexed with.
    fn analyzer(&self) -> Arc<PerFieldAnalyzer>;

    /// Close the index. Every later call fails with
    /// [`ExamineError::CollaboratorUnavailable`](crate::error::ExamineError::CollaboratorUnavailable).
    fn close(&self) -> Result<()>;

    /// Check if the index is closed.
    fn is_closed(&self) -> bool;
}
