//! Sort specifications attached to a compiled query.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort order for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (lowest to highest).
    Asc,
    /// Descending order (highest to lowest).
    Desc,
}

/// One key of a multi-key sort. The first key added is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field name to sort by.
    pub name: String,
    /// Sort order.
    pub order: SortOrder,
}

impl SortField {
    /// Sort ascending by `name`.
    pub fn asc<S: Into<String>>(name: S) -> Self {
        SortField {
            name: name.into(),
            order: SortOrder::Asc,
        }
    }

    /// Sort descending by `name`.
    pub fn desc<S: Into<String>>(name: S) -> Self {
        SortField {
            name: name.into(),
            order: SortOrder::Desc,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Asc => write!(f, "{} asc", self.name),
            SortOrder::Desc => write!(f, "{} desc", self.name),
        }
    }
}
