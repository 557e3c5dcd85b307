//! Wildcard patterns matched against indexed terms.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{ExamineError, Result};

/// A compiled wildcard pattern.
///
/// Supports the following wildcards:
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
/// - `\*`, `\?` and any other `\x` match the literal character
///
/// Matching ignores case, the same way expanded wildcard terms are
/// lowercased before they meet the term dictionary.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    /// The pattern as written.
    pattern: String,
    /// The compiled regex for matching.
    regex: Arc<Regex>,
}

impl WildcardPattern {
    /// Compile a wildcard pattern.
    pub fn new<S: Into<String>>(pattern: S) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Self::compile_pattern(&pattern)?;

        Ok(WildcardPattern {
            pattern,
            regex: Arc::new(regex),
        })
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }

    /// Compile a wildcard pattern into an anchored, case-insensitive regex.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        let mut regex_pattern = String::from("(?i)^");

        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                    None => regex_pattern.push_str("\\\\"),
                },
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                c => regex_pattern.push_str(&regex::escape(&c.to_string())),
            }
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| ExamineError::invalid_value(format!("Invalid wildcard pattern: {e}")))
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
