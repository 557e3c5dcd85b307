//! Search values: a term plus the modifiers that decorate it.
//!
//! Plain constructor functions stand in for decorating raw strings:
//!
//! ```
//! use examine::query::value::{boost, escape, proximity, wildcard};
//!
//! let v = wildcard("CWS");
//! assert_eq!(v.text(), "CWS*");
//! assert!(v.is_wildcarded());
//!
//! let v = boost("CWS\\_Home", 10.0).with_proximity(2);
//! assert_eq!(v.boost(), Some(10.0));
//! assert_eq!(v.proximity(), Some(2));
//!
//! assert!(escape("a+b").is_escaped());
//! assert_eq!(proximity("Warren creative", 5).proximity(), Some(5));
//! ```
//!
//! Modifiers compose. Boost scales any value. Proximity applies to the
//! terms the value expands to, whether they are exact, fuzzy or wildcard
//! patterns. Escaping turns wildcard characters into literal text, so an
//! escaped value is never expanded. A fuzzy edit budget cannot be combined
//! with escaping or wildcards; [`SearchValue::validate`] rejects both.

use serde::{Deserialize, Serialize};

use crate::error::{ExamineError, Result};

/// Characters reserved by the query grammar.
pub const RESERVED_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// A typed search term carrying its modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchValue {
    text: String,
    wildcarded: bool,
    escaped: bool,
    boost: Option<f32>,
    proximity: Option<u32>,
    fuzzy: Option<u32>,
}

impl SearchValue {
    /// Create an undecorated value.
    pub fn new<S: Into<String>>(text: S) -> Self {
        SearchValue {
            text: text.into(),
            wildcarded: false,
            escaped: false,
            boost: None,
            proximity: None,
            fuzzy: None,
        }
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `*` and `?` are wildcards.
    pub fn is_wildcarded(&self) -> bool {
        self.wildcarded
    }

    /// Whether the text is matched literally.
    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    /// The boost factor, if any.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// The maximum word distance between terms, if any.
    pub fn proximity(&self) -> Option<u32> {
        self.proximity
    }

    /// The maximum edit distance, if any.
    pub fn fuzzy(&self) -> Option<u32> {
        self.fuzzy
    }

    /// Treat `*` and `?` in the text as wildcards.
    pub fn wildcarded(mut self) -> Self {
        self.wildcarded = true;
        self
    }

    /// Match the text literally.
    pub fn escaped(mut self) -> Self {
        self.escaped = true;
        self
    }

    /// Scale this value's contribution to the relevance score.
    pub fn with_boost(mut self, factor: f32) -> Self {
        self.boost = Some(factor);
        self
    }

    /// Require the terms to occur within `distance` words of each other.
    pub fn with_proximity(mut self, distance: u32) -> Self {
        self.proximity = Some(distance);
        self
    }

    /// Match terms within `max_edits` Levenshtein edits.
    pub fn with_fuzzy(mut self, max_edits: u32) -> Self {
        self.fuzzy = Some(max_edits);
        self
    }

    /// Check the modifiers before the value joins a criteria.
    pub fn validate(&self) -> Result<()> {
        if let Some(factor) = self.boost {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ExamineError::invalid_value(format!(
                    "boost must be a positive finite number, got {factor}"
                )));
            }
        }
        if self.fuzzy.is_some() {
            if self.escaped {
                return Err(ExamineError::invalid_value(format!(
                    "{:?} is matched literally and cannot be fuzzy",
                    self.text
                )));
            }
            if self.wildcarded {
                return Err(ExamineError::invalid_value(format!(
                    "{:?} cannot be both a wildcard and fuzzy",
                    self.text
                )));
            }
        }
        Ok(())
    }
}

impl From<&str> for SearchValue {
    fn from(value: &str) -> Self {
        SearchValue::new(value)
    }
}

impl From<String> for SearchValue {
    fn from(value: String) -> Self {
        SearchValue::new(value)
    }
}

impl From<&String> for SearchValue {
    fn from(value: &String) -> Self {
        SearchValue::new(value.as_str())
    }
}

impl From<i64> for SearchValue {
    fn from(value: i64) -> Self {
        SearchValue::new(value.to_string())
    }
}

/// A multiple-character wildcard value. `*` is appended when the text has
/// no wildcard character of its own.
pub fn wildcard<S: Into<String>>(text: S) -> SearchValue {
    with_trailing_wildcard(text.into(), '*')
}

/// A single-character wildcard value. `?` is appended when the text has
/// no wildcard character of its own.
pub fn single_character_wildcard<S: Into<String>>(text: S) -> SearchValue {
    with_trailing_wildcard(text.into(), '?')
}

/// A trailing lone backslash stands for itself, so it is doubled before
/// `wildcard` is appended; otherwise it would escape the wildcard.
fn with_trailing_wildcard(mut text: String, wildcard: char) -> SearchValue {
    if !has_wildcard(&text) {
        let trailing = text.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            text.push('\\');
        }
        text.push(wildcard);
    }
    SearchValue::new(text).wildcarded()
}

/// A value matched literally, reserved characters included.
pub fn escape<S: Into<String>>(text: S) -> SearchValue {
    SearchValue::new(text).escaped()
}

/// A boosted value.
pub fn boost<S: Into<String>>(text: S, factor: f32) -> SearchValue {
    SearchValue::new(text).with_boost(factor)
}

/// A proximity value: its words must occur within `distance` words.
pub fn proximity<S: Into<String>>(text: S, distance: u32) -> SearchValue {
    SearchValue::new(text).with_proximity(distance)
}

/// A fuzzy value.
pub fn fuzzy<S: Into<String>>(text: S, max_edits: u32) -> SearchValue {
    SearchValue::new(text).with_fuzzy(max_edits)
}

/// Backslash-escape every reserved character in `text`.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Resolve backslash escapes: `\x` becomes `x`. A trailing lone backslash is kept.
pub fn unescape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => result.push(next),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Check for an unescaped `*` or `?`.
pub fn has_wildcard(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}
