//! Error types for the Examine library.
//!
//! All failures are represented by the [`ExamineError`] enum. Grammar and
//! arity mistakes in a fluent criteria chain are raised at the call that
//! makes them, not deferred to compile or execute time.
//!
//! # Examples
//!
//! ```
//! use examine::error::{ErrorKind, ExamineError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ExamineError::invalid_grammar("and() called with no preceding clause"))
//! }
//!
//! let err = example_operation().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidGrammar);
//! ```

use std::io;

use thiserror::Error;

/// Coarse classification of failures.
///
/// `UnknownField` and `EmptyQuery` are part of the taxonomy but the core
/// recovers from both (zero matches and an empty result respectively), so
/// no [`ExamineError`] ever reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed fluent chain: a joiner with no operand, a dangling NOT.
    InvalidGrammar,
    /// Grouped operation with differing field and value counts.
    ArityMismatch,
    /// Field absent from every document schema.
    UnknownField,
    /// Compiled query without clauses.
    EmptyQuery,
    /// The document store cannot be reached.
    CollaboratorUnavailable,
    /// Anything else.
    Other,
}

/// The main error type for Examine operations.
#[derive(Error, Debug)]
pub enum ExamineError {
    /// A fluent call that the criteria grammar does not allow in its current state.
    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    /// A grouped operation received a different number of fields and values.
    #[error("Arity mismatch: {fields} field(s) but {values} value(s)")]
    ArityMismatch { fields: usize, values: usize },

    /// A search value that cannot be turned into a predicate.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The index backend could not serve a snapshot.
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with ExamineError.
pub type Result<T> = std::result::Result<T, ExamineError>;

impl ExamineError {
    /// Create a new grammar error.
    pub fn invalid_grammar<S: Into<String>>(msg: S) -> Self {
        ExamineError::InvalidGrammar(msg.into())
    }

    /// Create a new arity mismatch error.
    pub fn arity_mismatch(fields: usize, values: usize) -> Self {
        ExamineError::ArityMismatch { fields, values }
    }

    /// Create a new invalid value error.
    pub fn invalid_value<S: Into<String>>(msg: S) -> Self {
        ExamineError::InvalidValue(msg.into())
    }

    /// Create a new collaborator error.
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        ExamineError::CollaboratorUnavailable(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ExamineError::Analysis(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ExamineError::Other(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExamineError::InvalidGrammar(_) => ErrorKind::InvalidGrammar,
            ExamineError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            ExamineError::CollaboratorUnavailable(_) => ErrorKind::CollaboratorUnavailable,
            _ => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ExamineError::invalid_grammar("or() called twice");
        assert_eq!(error.to_string(), "Invalid grammar: or() called twice");
        assert_eq!(error.kind(), ErrorKind::InvalidGrammar);

        let error = ExamineError::arity_mismatch(2, 3);
        assert_eq!(error.to_string(), "Arity mismatch: 2 field(s) but 3 value(s)");
        assert_eq!(error.kind(), ErrorKind::ArityMismatch);

        let error = ExamineError::unavailable("index closed");
        assert_eq!(error.kind(), ErrorKind::CollaboratorUnavailable);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let examine_error = ExamineError::from(io_error);

        match examine_error {
            ExamineError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
        assert_eq!(ExamineError::other("x").kind(), ErrorKind::Other);
    }
}
