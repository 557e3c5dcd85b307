//! Per-field analyzer (Lucene-compatible).

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A per-field analyzer that applies different analyzers to different fields.
///
/// Fields without an explicit entry use the default analyzer. Field names
/// are matched exactly, case included.
///
/// # Example
///
/// ```
/// use examine::analysis::{Analyzer, KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};
/// use std::sync::Arc;
///
/// let keyword_analyzer: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::new());
/// let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
/// analyzer.add_analyzer("id", Arc::clone(&keyword_analyzer));
///
/// assert_eq!(analyzer.field_terms("id", "A-1 B").unwrap(), vec!["A-1 B"]);
/// assert_eq!(analyzer.field_terms("name", "A-1 B").unwrap(), vec!["a", "1", "b"]);
/// ```
#[derive(Clone)]
pub struct PerFieldAnalyzer {
    /// Default analyzer for fields not in the map.
    default_analyzer: Arc<dyn Analyzer>,

    /// Map of field names to their specific analyzers.
    field_analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a new per-field analyzer with a default analyzer.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Add a field-specific analyzer.
    pub fn add_analyzer(&mut self, field: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// Get the analyzer for a specific field.
    pub fn get_analyzer(&self, field: &str) -> &Arc<dyn Analyzer> {
        self.field_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// Get the default analyzer.
    pub fn default_analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.default_analyzer
    }

    /// Analyze text with the analyzer for the given field.
    pub fn analyze_field(&self, field: &str, text: &str) -> Result<TokenStream> {
        self.get_analyzer(field).analyze(text)
    }

    /// Analyze text with the analyzer for the given field, keeping only terms.
    pub fn field_terms(&self, field: &str, text: &str) -> Result<Vec<String>> {
        self.get_analyzer(field).terms(text)
    }
}

impl Analyzer for PerFieldAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        // When used as a regular Analyzer, use the default analyzer
        self.default_analyzer.analyze(text)
    }

    fn name(&self) -> &'static str {
        "per_field"
    }
}

impl std::fmt::Debug for PerFieldAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self.field_analyzers.keys().collect();
        fields.sort();
        f.debug_struct("PerFieldAnalyzer")
            .field("default", &self.default_analyzer.name())
            .field("fields", &fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{KeywordAnalyzer, StandardAnalyzer};

    #[test]
    fn test_per_field_analyzer() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        analyzer.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));

        let tokens: Vec<_> = analyzer.analyze_field("title", "Hello World").unwrap().collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");

        let tokens: Vec<_> = analyzer.analyze_field("id", "Hello World").unwrap().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "Hello World");
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        analyzer.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));

        assert_eq!(analyzer.get_analyzer("ID").name(), "standard");
        assert_eq!(analyzer.get_analyzer("id").name(), "keyword");
    }
}
