//! Index configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};

/// Built-in analyzers a field can be indexed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Unicode words, lowercased.
    #[default]
    Standard,
    /// The whole value as one case-preserving term.
    Keyword,
}

impl AnalyzerKind {
    fn build(self) -> Arc<dyn Analyzer> {
        match self {
            AnalyzerKind::Standard => Arc::new(StandardAnalyzer::new()),
            AnalyzerKind::Keyword => Arc::new(KeywordAnalyzer::new()),
        }
    }
}

/// Configuration for an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Analyzer for fields without an override.
    pub default_analyzer: AnalyzerKind,

    /// Fields indexed with the keyword analyzer.
    pub keyword_fields: Vec<String>,

    /// JSON property naming a document's type when loading JSON lines.
    pub type_field: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            default_analyzer: AnalyzerKind::Standard,
            keyword_fields: Vec::new(),
            type_field: "__IndexType".to_string(),
        }
    }
}

impl IndexConfig {
    /// Build the per-field analyzer this configuration describes.
    pub fn build_analyzer(&self) -> PerFieldAnalyzer {
        let mut analyzer = PerFieldAnalyzer::new(self.default_analyzer.build());
        let keyword = AnalyzerKind::Keyword.build();
        for field in &self.keyword_fields {
            analyzer.add_analyzer(field.clone(), Arc::clone(&keyword));
        }
        analyzer
    }
}
