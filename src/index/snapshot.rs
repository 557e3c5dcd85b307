//! Immutable views of an index's document set.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::PerFieldAnalyzer;
use crate::document::Document;
use crate::error::Result;
use crate::index::DocId;
use crate::query::TypeFilter;

/// One analyzed field of a stored document.
#[derive(Debug, Clone)]
pub struct IndexedField {
    raw: String,
    folded: String,
    terms: AHashMap<String, Vec<u32>>,
    length: u32,
}

impl IndexedField {
    /// Analyze `raw` for `field`.
    pub fn analyze(field: &str, raw: String, analyzer: &PerFieldAnalyzer) -> Result<Self> {
        let mut terms: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut length = 0;
        for token in analyzer.analyze_field(field, &raw)? {
            terms
                .entry(token.text)
                .or_default()
                .push(token.position as u32);
            length += 1;
        }

        Ok(IndexedField {
            folded: raw.to_lowercase(),
            raw,
            terms,
            length,
        })
    }

    /// The text the field was indexed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The raw text, lowercased.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Number of terms in the field.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Ascending positions of `term`, if it occurs.
    pub fn positions(&self, term: &str) -> Option<&[u32]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Number of occurrences of `term`.
    pub fn term_freq(&self, term: &str) -> u32 {
        self.positions(term).map_or(0, |p| p.len() as u32)
    }

    /// Distinct terms of the field, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

/// A stored document together with its analyzed fields.
#[derive(Debug)]
pub struct IndexedDocument {
    doc_id: DocId,
    doc_type: String,
    document: Arc<Document>,
    fields: BTreeMap<String, IndexedField>,
}

impl IndexedDocument {
    /// Analyze every field of `document`.
    pub fn analyze(
        doc_id: DocId,
        doc_type: &str,
        document: Document,
        analyzer: &PerFieldAnalyzer,
    ) -> Result<Self> {
        let mut fields = BTreeMap::new();
        for (name, value) in document.fields() {
            let field = IndexedField::analyze(name, value.index_text(), analyzer)?;
            fields.insert(name.clone(), field);
        }

        Ok(IndexedDocument {
            doc_id,
            doc_type: doc_type.to_string(),
            document: Arc::new(document),
            fields,
        })
    }

    pub fn doc_id(&self) -> DocId {
        self.doc_id
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn field(&self, name: &str) -> Option<&IndexedField> {
        self.fields.get(name)
    }

    /// Analyzed fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &IndexedField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }
}

/// Collection statistics for one field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldStats {
    /// Documents that have the field.
    pub doc_count: u64,
    /// Terms across all those documents.
    pub total_terms: u64,
}

impl FieldStats {
    /// Average number of terms per document that has the field.
    pub fn avg_length(&self) -> f32 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_terms as f32 / self.doc_count as f32
        }
    }

    fn add(&mut self, other: &FieldStats) {
        self.doc_count += other.doc_count;
        self.total_terms += other.total_terms;
    }
}

/// An immutable run of documents with its own field statistics and
/// document frequencies.
///
/// Segments are never modified once built. A write appends a new segment
/// and merges trailing segments of similar size, so a snapshot holds a
/// logarithmic number of them and publishing one only copies `Arc`s.
#[derive(Debug, Default)]
pub struct Segment {
    documents: Vec<Arc<IndexedDocument>>,
    field_stats: AHashMap<String, FieldStats>,
    doc_freqs: AHashMap<String, AHashMap<String, u64>>,
}

impl Segment {
    /// Build a segment over `documents`, computing its statistics.
    pub fn new(documents: Vec<Arc<IndexedDocument>>) -> Self {
        let mut segment = Segment {
            documents: Vec::new(),
            field_stats: AHashMap::new(),
            doc_freqs: AHashMap::new(),
        };
        for document in &documents {
            segment.account(document);
        }
        segment.documents = documents;
        segment
    }

    /// Combine two adjacent segments, `self` first.
    pub fn merge(&self, other: &Segment) -> Self {
        let (mut merged, smaller) = if self.doc_freqs.len() >= other.doc_freqs.len() {
            (self.clone_stats(), other)
        } else {
            (other.clone_stats(), self)
        };

        for (name, stats) in &smaller.field_stats {
            merged.field_stats.entry(name.clone()).or_default().add(stats);
        }
        for (name, freqs) in &smaller.doc_freqs {
            let merged_freqs = merged.doc_freqs.entry(name.clone()).or_default();
            for (term, count) in freqs {
                *merged_freqs.entry(term.clone()).or_insert(0) += count;
            }
        }

        merged.documents = self
            .documents
            .iter()
            .chain(&other.documents)
            .map(Arc::clone)
            .collect();
        merged
    }

    fn clone_stats(&self) -> Self {
        Segment {
            documents: Vec::new(),
            field_stats: self.field_stats.clone(),
            doc_freqs: self.doc_freqs.clone(),
        }
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> &[Arc<IndexedDocument>] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn account(&mut self, document: &IndexedDocument) {
        for (name, field) in document.fields() {
            let stats = self.field_stats.entry(name.to_string()).or_default();
            stats.doc_count += 1;
            stats.total_terms += u64::from(field.length());

            let freqs = self.doc_freqs.entry(name.to_string()).or_default();
            for term in field.terms() {
                *freqs.entry(term.to_string()).or_insert(0) += 1;
            }
        }
    }
}

/// A point-in-time view of every document in an index.
///
/// Documents are kept in insertion order, which is also ascending
/// [`DocId`] order. Cloning a snapshot copies segment handles only.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    segments: Vec<Arc<Segment>>,
    len: usize,
    next_doc_id: DocId,
}

impl IndexSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The segments, oldest first.
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    /// All documents, in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<IndexedDocument>> {
        self.segments.iter().flat_map(|s| s.documents.iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Count the documents admitted by `filter`.
    pub fn count(&self, filter: &TypeFilter) -> usize {
        match filter {
            TypeFilter::All => self.len,
            TypeFilter::Type(_) => self
                .documents()
                .filter(|d| filter.admits(d.doc_type()))
                .count(),
        }
    }

    /// Whether any document has `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.segments
            .iter()
            .any(|s| s.field_stats.contains_key(field))
    }

    pub fn field_stats(&self, field: &str) -> FieldStats {
        let mut total = FieldStats::default();
        for segment in &self.segments {
            if let Some(stats) = segment.field_stats.get(field) {
                total.add(stats);
            }
        }
        total
    }

    /// Number of documents whose `field` contains `term`.
    pub fn doc_freq(&self, field: &str, term: &str) -> u64 {
        self.segments
            .iter()
            .filter_map(|s| s.doc_freqs.get(field)?.get(term))
            .sum()
    }

    /// Analyze `documents` into one new segment and append it. Returns the
    /// assigned ids in order; on error nothing is appended.
    pub(crate) fn append<S, I>(
        &mut self,
        documents: I,
        analyzer: &PerFieldAnalyzer,
    ) -> Result<Vec<DocId>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Document)>,
    {
        let mut indexed = Vec::new();
        let mut doc_id = self.next_doc_id;
        for (doc_type, document) in documents {
            indexed.push(Arc::new(IndexedDocument::analyze(
                doc_id,
                doc_type.as_ref(),
                document,
                analyzer,
            )?));
            doc_id += 1;
        }
        if indexed.is_empty() {
            return Ok(Vec::new());
        }

        let ids = (self.next_doc_id..doc_id).collect();
        self.next_doc_id = doc_id;
        self.len += indexed.len();
        self.segments.push(Arc::new(Segment::new(indexed)));
        self.merge_tail();
        Ok(ids)
    }

    /// Merge the last two segments while the newer one is at least as large
    /// as the one before it. Sizes then shrink strictly towards the tail.
    fn merge_tail(&mut self) {
        while let [.., older, newer] = self.segments.as_slice() {
            if newer.len() < older.len() {
                break;
            }
            let merged = older.merge(newer);
            self.segments.truncate(self.segments.len() - 2);
            self.segments.push(Arc::new(merged));
        }
    }

    /// Drop every document of `doc_type`. Segments without such documents
    /// are kept as they are.
    pub(crate) fn remove_type(&mut self, doc_type: &str) -> usize {
        let mut removed = 0;
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            if !segment.documents.iter().any(|d| d.doc_type() == doc_type) {
                segments.push(segment);
                continue;
            }
            let kept: Vec<_> = segment
                .documents
                .iter()
                .filter(|d| d.doc_type() != doc_type)
                .map(Arc::clone)
                .collect();
            removed += segment.len() - kept.len();
            if !kept.is_empty() {
                segments.push(Arc::new(Segment::new(kept)));
            }
        }
        self.segments = segments;
        self.len -= removed;
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::{KeywordAnalyzer, StandardAnalyzer};

    fn analyzer() -> PerFieldAnalyzer {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        analyzer.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));
        analyzer
    }

    fn doc(id: &str, body: &str) -> Document {
        Document::builder().add_text("id", id).add_text("body", body).build()
    }

    #[test]
    fn test_indexed_field_positions() {
        let field =
            IndexedField::analyze("body", "the cat saw the dog".into(), &analyzer()).unwrap();
        assert_eq!(field.positions("the"), Some(&[0, 3][..]));
        assert_eq!(field.term_freq("dog"), 1);
        assert_eq!(field.length(), 5);
        assert_eq!(field.folded(), "the cat saw the dog");
    }

    #[test]
    fn test_stats_track_appends_and_removals() {
        let analyzer = analyzer();
        let mut snapshot = IndexSnapshot::new();
        snapshot
            .append([("content", doc("A-1", "hello world"))], &analyzer)
            .unwrap();
        snapshot
            .append([("media", doc("B-2", "hello"))], &analyzer)
            .unwrap();

        assert_eq!(snapshot.doc_freq("body", "hello"), 2);
        assert_eq!(snapshot.doc_freq("id", "A-1"), 1);
        assert_eq!(snapshot.field_stats("body").avg_length(), 1.5);
        assert_eq!(snapshot.count(&TypeFilter::from("media")), 1);

        assert_eq!(snapshot.remove_type("media"), 1);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.doc_freq("body", "hello"), 1);
        assert_eq!(snapshot.field_stats("body").total_terms, 2);
        assert!(!snapshot.has_field("missing"));
    }

    #[test]
    fn test_doc_ids_are_not_reused() {
        let analyzer = analyzer();
        let mut snapshot = IndexSnapshot::new();
        snapshot.append([("media", doc("1", "a"))], &analyzer).unwrap();
        snapshot.remove_type("media");
        let ids = snapshot.append([("media", doc("2", "b"))], &analyzer).unwrap();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_single_document_appends_keep_few_segments() {
        let analyzer = analyzer();
        let mut snapshot = IndexSnapshot::new();
        for i in 0..2000 {
            let body = if i % 2 == 0 { "even page" } else { "odd page" };
            snapshot
                .append([("content", doc(&i.to_string(), body))], &analyzer)
                .unwrap();
        }

        // One segment per set bit of 2000 = 0b111_1101_0000.
        assert_eq!(snapshot.segments().len(), 6);
        assert_eq!(snapshot.len(), 2000);
        assert_eq!(snapshot.doc_freq("body", "page"), 2000);
        assert_eq!(snapshot.doc_freq("body", "even"), 1000);
        assert_eq!(snapshot.field_stats("body").doc_count, 2000);

        let ids: Vec<DocId> = snapshot.documents().map(|d| d.doc_id()).collect();
        assert_eq!(ids, (0..2000).collect::<Vec<_>>());
    }

    #[test]
    fn test_append_shares_untouched_segments() {
        let analyzer = analyzer();
        let mut snapshot = IndexSnapshot::new();
        let batch: Vec<_> = (0..8).map(|i| ("content", doc(&i.to_string(), "x"))).collect();
        snapshot.append(batch, &analyzer).unwrap();
        let before = snapshot.clone();

        snapshot.append([("content", doc("9", "y"))], &analyzer).unwrap();

        assert_eq!(snapshot.segments().len(), 2);
        assert!(Arc::ptr_eq(&before.segments()[0], &snapshot.segments()[0]));
        assert_eq!(before.len(), 8);
    }

    #[test]
    fn test_remove_type_rebuilds_only_affected_segments() {
        let analyzer = analyzer();
        let mut snapshot = IndexSnapshot::new();
        let batch: Vec<_> = (0..4).map(|i| ("content", doc(&i.to_string(), "x"))).collect();
        snapshot.append(batch, &analyzer).unwrap();
        snapshot.append([("media", doc("m", "x"))], &analyzer).unwrap();
        let first = Arc::clone(&snapshot.segments()[0]);

        assert_eq!(snapshot.remove_type("media"), 1);
        assert_eq!(snapshot.segments().len(), 1);
        assert!(Arc::ptr_eq(&first, &snapshot.segments()[0]));
        assert_eq!(snapshot.doc_freq("body", "x"), 4);
    }
}
