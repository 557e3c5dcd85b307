//! Documents stored in an index.
//!
//! Documents are flexible collections of field-value pairs; no schema is
//! declared up front, and different document types (for example "content"
//! and "media") routinely carry different fields.
//!
//! - [`document::Document`] - The field-value map plus a fluent builder
//! - [`field_value::FieldValue`] - Typed field values
//!
//! # Examples
//!
//! ```
//! use examine::document::document::Document;
//!
//! let doc = Document::builder()
//!     .add_text("nodeName", "About Us")
//!     .add_integer("id", 1062)
//!     .build();
//!
//! assert_eq!(doc.len(), 2);
//! assert_eq!(doc.get_field("nodeName").and_then(|v| v.as_text()), Some("About Us"));
//! ```

#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
