//! Search criteria, their compilation, and the compiled query tree.
//!
//! The flow is: obtain a [`Criteria`] scoped to a [`TypeFilter`] and a
//! default [`BooleanOperation`], chain clause calls, then
//! [`Criteria::compile`] it into an immutable [`CompiledQuery`] that a
//! [`Searcher`](crate::search::Searcher) executes.
//!
//! ```
//! use examine::query::value::wildcard;
//! use examine::query::{BooleanOperation, Criteria, TypeFilter};
//!
//! let query = Criteria::new(TypeFilter::All, BooleanOperation::Or)
//!     .node_type_alias("Image")?
//!     .or()?
//!     .node_type_alias(wildcard("CWS"))?
//!     .compile()?;
//!
//! assert_eq!(query.to_string(), "type:image type:CWS*");
//! # Ok::<(), examine::error::ExamineError>(())
//! ```

pub mod compiled;
pub mod compiler;
pub mod criteria;
pub mod sort;
pub mod value;
pub mod wildcard;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::compiled::{CompiledQuery, FieldTarget, Leaf, Predicate, QueryNode, TermMatcher};
pub use self::compiler::QueryCompiler;
pub use self::criteria::{Clause, Criteria, GroupOperation, GroupTag, Joiner};
pub use self::sort::{SortField, SortOrder};
pub use self::value::SearchValue;
pub use self::wildcard::WildcardPattern;

/// Field holding the node type alias (document sub-type such as "Image").
pub const NODE_TYPE_ALIAS_FIELD: &str = "type";
/// Field holding the node name.
pub const NODE_NAME_FIELD: &str = "name";
/// Field holding the node id.
pub const ID_FIELD: &str = "id";
/// Field holding the parent node id.
pub const PARENT_ID_FIELD: &str = "parentID";

/// How clauses combine when no explicit joiner is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOperation {
    /// Every clause must match.
    #[default]
    And,
    /// Any clause may match.
    Or,
}

/// Coarse partition of the index a query considers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeFilter {
    /// Every document type.
    #[default]
    All,
    /// Only documents added under this type. Matched case-sensitively.
    Type(String),
}

impl TypeFilter {
    /// Check whether a document type passes this filter.
    pub fn admits(&self, doc_type: &str) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Type(t) => t == doc_type,
        }
    }
}

impl From<&str> for TypeFilter {
    fn from(value: &str) -> Self {
        TypeFilter::Type(value.to_string())
    }
}

impl From<String> for TypeFilter {
    fn from(value: String) -> Self {
        TypeFilter::Type(value)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "*"),
            TypeFilter::Type(t) => write!(f, "{t}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_filter_admits() {
        assert!(TypeFilter::All.admits("media"));
        assert!(TypeFilter::from("media").admits("media"));
        assert!(!TypeFilter::from("media").admits("Media"));
        assert!(!TypeFilter::from("media").admits("content"));
    }

    #[test]
    fn test_boolean_operation_default() {
        assert_eq!(BooleanOperation::default(), BooleanOperation::And);
    }
}
