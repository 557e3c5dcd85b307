//! The immutable, executable form of a criteria.
//!
//! A [`CompiledQuery`] is a tree of boolean [`QueryNode`]s over [`Leaf`]
//! predicates. Boost factors ride on the leaves as execution hints rather
//! than forming nodes of their own. Nothing in this module mutates a tree
//! after construction, so one compiled query can be shared across threads
//! and executed concurrently.

use std::collections::BTreeSet;
use std::fmt;

use crate::query::sort::SortField;
use crate::query::value::escape_text;
use crate::query::wildcard::WildcardPattern;
use crate::query::{BooleanOperation, TypeFilter};

/// The field(s) a leaf looks at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    /// A single field, matched by exact name.
    Named(String),
    /// Every field of the document.
    AllFields,
}

impl fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTarget::Named(name) => write!(f, "{name}"),
            FieldTarget::AllFields => write!(f, "*"),
        }
    }
}

/// One slot of a proximity leaf: the field terms that can fill it.
#[derive(Debug, Clone, PartialEq)]
pub enum TermMatcher {
    /// The analyzed term itself.
    Exact(String),
    /// Any term matching the pattern.
    Pattern(WildcardPattern),
    /// Any term within `max_edits` edits.
    Fuzzy { term: String, max_edits: u32 },
}

impl fmt::Display for TermMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermMatcher::Exact(term) => write!(f, "{term}"),
            TermMatcher::Pattern(pattern) => write!(f, "{pattern}"),
            TermMatcher::Fuzzy { term, max_edits } => write!(f, "{term}~{max_edits}"),
        }
    }
}

/// What a leaf requires of a field's terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A single analyzed term.
    Term { term: String },
    /// Consecutive terms, in order.
    Phrase { terms: Vec<String> },
    /// Every slot filled within `distance` words of the others, in any order.
    Proximity {
        terms: Vec<TermMatcher>,
        distance: u32,
    },
    /// Any indexed term matching the pattern.
    Wildcard { pattern: WildcardPattern },
    /// Any indexed term within `max_edits` edits.
    Fuzzy { term: String, max_edits: u32 },
    /// The literal text occurs verbatim (ignoring case) and its analyzed
    /// terms occur as a phrase.
    Literal { text: String, terms: Vec<String> },
    /// The value analyzed to no terms at all; never matches.
    Nothing,
}

/// A leaf predicate bound to its field and boost.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub field: FieldTarget,
    pub predicate: Predicate,
    pub boost: f32,
}

impl Leaf {
    pub fn new(field: FieldTarget, predicate: Predicate, boost: f32) -> Self {
        Leaf {
            field,
            predicate,
            boost,
        }
    }
}

/// A node of the boolean expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Leaf(Leaf),
    /// Every child must match.
    And(Vec<QueryNode>),
    /// At least one child must match.
    Or(Vec<QueryNode>),
    /// The child must not match. Only ever produced as a child of `And`.
    Not(Box<QueryNode>),
}

impl QueryNode {
    /// Visit every leaf, left to right.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a Leaf)) {
        match self {
            QueryNode::Leaf(leaf) => visit(leaf),
            QueryNode::And(children) | QueryNode::Or(children) => {
                for child in children {
                    child.for_each_leaf(visit);
                }
            }
            QueryNode::Not(inner) => inner.for_each_leaf(visit),
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, top: bool) -> fmt::Result {
        match self {
            QueryNode::Leaf(leaf) => write!(f, "{leaf}"),
            QueryNode::Not(inner) => {
                write!(f, "-")?;
                inner.fmt_node(f, false)
            }
            QueryNode::And(children) | QueryNode::Or(children) => {
                let conjunction = matches!(self, QueryNode::And(_));
                if !top {
                    write!(f, "(")?;
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    if conjunction && !matches!(child, QueryNode::Not(_)) {
                        write!(f, "+")?;
                    }
                    child.fmt_node(f, false)?;
                }
                if !top {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.field)?;
        match &self.predicate {
            Predicate::Term { term } => write!(f, "{term}")?,
            Predicate::Phrase { terms } => write!(f, "\"{}\"", terms.join(" "))?,
            Predicate::Proximity { terms, distance } => {
                write!(f, "\"")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{term}")?;
                }
                write!(f, "\"~{distance}")?
            }
            Predicate::Wildcard { pattern } => write!(f, "{pattern}")?,
            Predicate::Fuzzy { term, max_edits } => write!(f, "{term}~{max_edits}")?,
            Predicate::Literal { text, .. } => write!(f, "\"{}\"", escape_text(text))?,
            Predicate::Nothing => write!(f, "\"\"")?,
        }
        if self.boost != 1.0 {
            write!(f, "^{}", self.boost)?;
        }
        Ok(())
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, true)
    }
}

/// An immutable query ready for execution.
///
/// Two criteria built from the same fluent call sequence compile to equal
/// `CompiledQuery` values, so equality can serve as a cache key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    root: Option<QueryNode>,
    type_filter: TypeFilter,
    default_operation: BooleanOperation,
    sort_fields: Vec<SortField>,
}

impl CompiledQuery {
    pub(crate) fn new(
        root: Option<QueryNode>,
        type_filter: TypeFilter,
        default_operation: BooleanOperation,
        sort_fields: Vec<SortField>,
    ) -> Self {
        CompiledQuery {
            root,
            type_filter,
            default_operation,
            sort_fields,
        }
    }

    /// The expression tree; `None` when the criteria had no clauses.
    pub fn root(&self) -> Option<&QueryNode> {
        self.root.as_ref()
    }

    /// The document types this query considers.
    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }

    /// The operation the criteria used between un-joined clauses.
    pub fn default_operation(&self) -> BooleanOperation {
        self.default_operation
    }

    /// Sort keys, primary first. Empty means relevance order.
    pub fn sort_fields(&self) -> &[SortField] {
        &self.sort_fields
    }

    /// Whether the criteria had no clauses.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Named fields referenced by the leaves, sorted.
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        if let Some(root) = &self.root {
            root.for_each_leaf(&mut |leaf| {
                if let FieldTarget::Named(name) = &leaf.field {
                    fields.insert(name.as_str());
                }
            });
        }
        fields
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{root}"),
            None => Ok(()),
        }
    }
}
