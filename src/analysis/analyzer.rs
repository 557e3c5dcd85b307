//! Analyzers combine a tokenizer with a chain of filters.
//!
//! - [`StandardAnalyzer`](standard::StandardAnalyzer) - Unicode words, lowercased
//! - [`KeywordAnalyzer`](keyword::KeywordAnalyzer) - Entire input as one token
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//! - [`PerFieldAnalyzer`](per_field::PerFieldAnalyzer) - Different analyzers per field
//!
//! # Examples
//!
//! ```
//! use examine::analysis::analyzer::Analyzer;
//! use examine::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new();
//! let terms = analyzer.terms("Hello World").unwrap();
//! assert_eq!(terms, vec!["hello", "world"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod keyword;
pub mod per_field;
pub mod pipeline;
pub mod standard;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can serve concurrent
/// indexing and query compilation.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze the text and keep only the term strings.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}
