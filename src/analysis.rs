//! Text analysis for Examine.
//!
//! Analysis is the pluggable capability that turns field text and query text
//! into comparable terms. Indexing and query compilation run the same
//! analyzer for a field, so a value matches when its analyzed terms line up
//! with the analyzed terms stored for a document.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Terms
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use analyzer::keyword::KeywordAnalyzer;
pub use analyzer::per_field::PerFieldAnalyzer;
pub use analyzer::pipeline::PipelineAnalyzer;
pub use analyzer::standard::StandardAnalyzer;
pub use token::{Token, TokenStream};
