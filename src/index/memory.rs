//! In-memory index with copy-on-write snapshots.
//!
//! Writers build the next [`IndexSnapshot`] from a clone of the current one
//! and swap it in under a write lock. A snapshot is a list of shared,
//! immutable segments, so the clone copies handles and a write only pays for
//! the documents it adds. Readers only ever hold an `Arc` to a finished
//! snapshot, so a search never observes a half-applied write.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use parking_lot::RwLock;
use serde_json::Value;

use crate::analysis::PerFieldAnalyzer;
use crate::document::Document;
use crate::error::{ExamineError, Result};
use crate::index::config::IndexConfig;
use crate::index::snapshot::IndexSnapshot;
use crate::index::{DocId, SearchIndex};
use crate::query::TypeFilter;

/// An index that keeps every document in process memory.
#[derive(Debug)]
pub struct MemoryIndex {
    config: IndexConfig,
    analyzer: Arc<PerFieldAnalyzer>,
    current: RwLock<Arc<IndexSnapshot>>,
    closed: AtomicBool,
}

impl MemoryIndex {
    /// Create an empty index with the default configuration.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Create an empty index.
    pub fn with_config(config: IndexConfig) -> Self {
        let analyzer = Arc::new(config.build_analyzer());
        MemoryIndex {
            config,
            analyzer,
            current: RwLock::new(Arc::new(IndexSnapshot::new())),
            closed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Add one JSON object per line. The document type is read from the
    /// configured `type_field` property, falling back to `default_type`.
    /// Blank lines are skipped. Returns the number of documents added.
    pub fn add_json_lines<R: BufRead>(&self, reader: R, default_type: Option<&str>) -> Result<usize> {
        let mut typed = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut value: Value = serde_json::from_str(&line)?;
            let doc_type = match value
                .as_object_mut()
                .and_then(|o| o.remove(&self.config.type_field))
            {
                Some(Value::String(t)) => t,
                Some(other) => {
                    return Err(ExamineError::other(format!(
                        "line {}: {} must be a string, got {other}",
                        line_no + 1,
                        self.config.type_field
                    )));
                }
                None => match default_type {
                    Some(t) => t.to_string(),
                    None => {
                        return Err(ExamineError::other(format!(
                            "line {}: missing {} and no default type given",
                            line_no + 1,
                            self.config.type_field
                        )));
                    }
                },
            };
            typed.push((doc_type, Document::from_json(&value)?));
        }

        let count = typed.len();
        self.write(|snapshot, analyzer| snapshot.append(typed, analyzer))?;
        info!("loaded {count} document(s) from JSON lines");
        Ok(count)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ExamineError::unavailable("index is closed"));
        }
        Ok(())
    }

    /// Apply `update` to a copy of the current snapshot and publish it.
    /// A failed update publishes nothing.
    fn write<T>(
        &self,
        update: impl FnOnce(&mut IndexSnapshot, &PerFieldAnalyzer) -> Result<T>,
    ) -> Result<T> {
        self.ensure_open()?;
        let mut current = self.current.write();
        let mut next = IndexSnapshot::clone(&current);
        let result = update(&mut next, &self.analyzer)?;
        *current = Arc::new(next);
        Ok(result)
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchIndex for MemoryIndex {
    fn add_documents(&self, doc_type: &str, documents: Vec<Document>) -> Result<Vec<DocId>> {
        let ids = self.write(|snapshot, analyzer| {
            snapshot.append(documents.into_iter().map(|d| (doc_type, d)), analyzer)
        })?;
        debug!("added {} {doc_type} document(s)", ids.len());
        Ok(ids)
    }

    fn replace_documents(&self, doc_type: &str, documents: Vec<Document>) -> Result<Vec<DocId>> {
        let (removed, ids) = self.write(|snapshot, analyzer| {
            let removed = snapshot.remove_type(doc_type);
            let ids = snapshot.append(documents.into_iter().map(|d| (doc_type, d)), analyzer)?;
            Ok((removed, ids))
        })?;
        debug!(
            "replaced {removed} {doc_type} document(s) with {}",
            ids.len()
        );
        Ok(ids)
    }

    fn delete_type(&self, doc_type: &str) -> Result<usize> {
        let removed = self.write(|snapshot, _| Ok(snapshot.remove_type(doc_type)))?;
        debug!("deleted {removed} {doc_type} document(s)");
        Ok(removed)
    }

    fn doc_count(&self, filter: &TypeFilter) -> Result<usize> {
        Ok(self.snapshot()?.count(filter))
    }

    fn snapshot(&self) -> Result<Arc<IndexSnapshot>> {
        self.ensure_open()?;
        Ok(Arc::clone(&self.current.read()))
    }

    fn analyzer(&self) -> Arc<PerFieldAnalyzer> {
        Arc::clone(&self.analyzer)
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::ErrorKind;

    fn doc(name: &str) -> Document {
        Document::builder().add_text("name", name).build()
    }

    #[test]
    fn test_add_and_count() {
        let index = MemoryIndex::new();
        let ids = index
            .add_documents("content", vec![doc("home"), doc("about")])
            .unwrap();
        index.add_documents("media", vec![doc("logo")]).unwrap();

        assert_eq!(ids, vec![0, 1]);
        assert_eq!(index.doc_count(&TypeFilter::All).unwrap(), 3);
        assert_eq!(index.doc_count(&TypeFilter::from("content")).unwrap(), 2);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let index = MemoryIndex::new();
        index.add_documents("content", vec![doc("home")]).unwrap();
        let before = index.snapshot().unwrap();

        index.add_documents("content", vec![doc("about")]).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(index.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_replace_documents_only_touches_one_type() {
        let index = MemoryIndex::new();
        index.add_documents("content", vec![doc("home"), doc("about")]).unwrap();
        index.add_documents("media", vec![doc("logo")]).unwrap();

        let ids = index.replace_documents("content", vec![doc("news")]).unwrap();

        assert_eq!(ids, vec![3]);
        assert_eq!(index.doc_count(&TypeFilter::from("content")).unwrap(), 1);
        assert_eq!(index.doc_count(&TypeFilter::from("media")).unwrap(), 1);
        assert_eq!(index.delete_type("media").unwrap(), 1);
    }

    #[test]
    fn test_closed_index_is_unavailable() {
        let index = MemoryIndex::new();
        index.close().unwrap();

        assert!(index.is_closed());
        let err = index.snapshot().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);
        let err = index.add_documents("content", vec![doc("x")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);
    }

    #[test]
    fn test_add_json_lines() {
        let input = r#"{"__IndexType": "content", "name": "Home", "id": 1051}

{"__IndexType": "media", "name": "Logo"}
{"name": "Untyped"}
"#;
        let index = MemoryIndex::new();
        let count = index.add_json_lines(Cursor::new(input), Some("content")).unwrap();

        assert_eq!(count, 3);
        assert_eq!(index.doc_count(&TypeFilter::from("content")).unwrap(), 2);
        let snapshot = index.snapshot().unwrap();
        let first = snapshot.documents().next().unwrap();
        assert!(!first.document().has_field("__IndexType"));
    }

    #[test]
    fn test_add_json_lines_requires_a_type() {
        let index = MemoryIndex::new();
        let result = index.add_json_lines(Cursor::new(r#"{"name": "x"}"#), None);
        assert!(result.is_err());
        assert_eq!(index.doc_count(&TypeFilter::All).unwrap(), 0);
    }

    #[test]
    fn test_many_single_document_adds() {
        let index = MemoryIndex::new();
        for i in 0..5000 {
            index
                .add_documents("content", vec![doc(&format!("page {i}"))])
                .unwrap();
        }

        let snapshot = index.snapshot().unwrap();
        assert_eq!(snapshot.len(), 5000);
        assert!(snapshot.segments().len() <= 13);
        assert_eq!(snapshot.doc_freq("name", "page"), 5000);
        assert_eq!(snapshot.doc_freq("name", "4999"), 1);
        assert_eq!(index.doc_count(&TypeFilter::from("content")).unwrap(), 5000);
    }
}
