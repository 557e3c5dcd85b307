//! Document structure for schema-less indexing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::field_value::FieldValue;
use crate::error::{ExamineError, Result};

/// A document represents a single item to be indexed.
///
/// The document type ("content", "media", ...) is not a field: it is the
/// tag the document is added under, see [`crate::index::SearchIndex`].
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Document {
    /// The field values for this document
    fields: HashMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: HashMap::new(),
        }
    }

    /// Add a field value to the document.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field from the document.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get all field values.
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Build a document from a flat JSON object.
    ///
    /// Nested objects and arrays are rejected; `null` members are skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ExamineError::other("document must be a JSON object"))?;

        let mut document = Document::new();
        for (name, member) in object {
            if let Some(field_value) = FieldValue::from_json(member)? {
                document.add_field(name.clone(), field_value);
            }
        }
        Ok(document)
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a text field to the document.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document
            .add_field(name, FieldValue::Text(value.into()));
        self
    }

    /// Add an integer field to the document.
    pub fn add_integer<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.document.add_field(name, FieldValue::Integer(value));
        self
    }

    /// Add a float field to the document.
    pub fn add_float<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.document.add_field(name, FieldValue::Float(value));
        self
    }

    /// Add a boolean field to the document.
    pub fn add_boolean<S: Into<String>>(mut self, name: S, value: bool) -> Self {
        self.document.add_field(name, FieldValue::Boolean(value));
        self
    }

    /// Add a datetime field to the document.
    pub fn add_datetime<S: Into<String>>(
        mut self,
        name: S,
        value: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        self.document.add_field(name, FieldValue::DateTime(value));
        self
    }

    /// Add a field with a generic value.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.document.add_field(name, value);
        self
    }

    /// Build the final document.
    pub fn build(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_builder() {
        let doc = Document::builder()
            .add_text("nodeName", "Home")
            .add_integer("id", 1)
            .add_boolean("published", true)
            .build();

        assert_eq!(doc.len(), 3);
        assert!(doc.has_field("published"));
        assert_eq!(doc.get_field("id"), Some(&FieldValue::Integer(1)));
    }

    #[test]
    fn test_from_json() {
        let doc = Document::from_json(&json!({
            "nodeName": "Home",
            "id": 1051,
            "sortOrder": 1.5,
            "umbracoNaviHide": false,
            "parentID": null
        }))
        .unwrap();

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.get_field("id"), Some(&FieldValue::Integer(1051)));
        assert_eq!(doc.get_field("sortOrder"), Some(&FieldValue::Float(1.5)));
        assert!(!doc.has_field("parentID"));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(Document::from_json(&json!([1, 2])).is_err());
        assert!(Document::from_json(&json!({"tags": ["a"]})).is_err());
    }
}
