//! Field value types for documents.
//!
//! Every value is indexed through its text form (see
//! [`FieldValue::index_text`]), so an integer `1062` can be matched by the
//! criteria value `"1062"`. Sorting compares the typed values.
//!
//! ```
//! use examine::document::field_value::FieldValue;
//!
//! let text_value = FieldValue::Text("hello".to_string());
//! assert_eq!(text_value.as_text(), Some("hello"));
//!
//! let int_value = FieldValue::Integer(42);
//! assert_eq!(int_value.index_text(), "42");
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExamineError, Result};

/// Represents a value for a field in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// DateTime value
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a float if this is a numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The text that gets analyzed and indexed for this value.
    pub fn index_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
        }
    }

    /// Convert a scalar JSON value. `null` yields `None`.
    ///
    /// Strings in RFC 3339 form become date-times.
    pub fn from_json(value: &Value) -> Result<Option<Self>> {
        let field_value = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => FieldValue::DateTime(dt.with_timezone(&Utc)),
                Err(_) => FieldValue::Text(s.clone()),
            },
            Value::Array(_) | Value::Object(_) => {
                return Err(ExamineError::other(
                    "field values must be scalars, not arrays or objects",
                ));
            }
        };
        Ok(Some(field_value))
    }

    /// Compare two values for sorting.
    ///
    /// Values of the same kind compare naturally; integers and floats compare
    /// numerically. Mixed kinds order by kind so the comparison stays total.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.kind_rank().cmp(&b.kind_rank()),
            },
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Boolean(_) => 0,
            FieldValue::Integer(_) | FieldValue::Float(_) => 1,
            FieldValue::DateTime(_) => 2,
            FieldValue::Text(_) => 3,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_text() {
        assert_eq!(FieldValue::Text("Home".into()).index_text(), "Home");
        assert_eq!(FieldValue::Integer(1062).index_text(), "1062");
        assert_eq!(FieldValue::Boolean(true).index_text(), "true");
    }

    #[test]
    fn test_sort_cmp() {
        let a = FieldValue::Text("About".into());
        let b = FieldValue::Text("Home".into());
        assert_eq!(a.sort_cmp(&b), Ordering::Less);

        assert_eq!(
            FieldValue::Integer(2).sort_cmp(&FieldValue::Float(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Boolean(true).sort_cmp(&FieldValue::Text("x".into())),
            Ordering::Less
        );
    }

    #[test]
    fn test_from_json_datetime() {
        let value = FieldValue::from_json(&json!("2009-06-26T14:30:00Z")).unwrap();
        assert!(matches!(value, Some(FieldValue::DateTime(_))));

        let value = FieldValue::from_json(&json!("codegarden 09")).unwrap();
        assert_eq!(value, Some(FieldValue::Text("codegarden 09".into())));
    }
}
