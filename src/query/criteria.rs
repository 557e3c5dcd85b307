//! The fluent criteria builder.
//!
//! A [`Criteria`] accumulates clauses left to right. Internally it is a
//! two-state machine:
//!
//! ```text
//!            field / group                 field / group
//! AwaitingClause ───────────▶ ClauseAdded ◀─────────────┐
//!       ▲                         │                       │
//!       └──── and / or / not ─────┘ (joiner now pending) ─┘
//! ```
//!
//! Joiners are only legal in `ClauseAdded`, so `and()` with nothing to join
//! from, or `or().or()`, fails right at the call with
//! [`ExamineError::InvalidGrammar`]. A clause appended without an explicit
//! joiner is joined with the criteria's default [`BooleanOperation`].
//! Sort keys can be added in either state.
//!
//! ```
//! use examine::query::{BooleanOperation, Criteria, TypeFilter};
//!
//! let query = Criteria::new(TypeFilter::from("content"), BooleanOperation::Or)
//!     .node_name("umbraco")?
//!     .or()?
//!     .field("headerText", "umbraco")?
//!     .compile()?;
//!
//! assert_eq!(query.to_string(), "name:umbraco headerText:umbraco");
//!
//! let err = Criteria::new(TypeFilter::All, BooleanOperation::And).and().unwrap_err();
//! assert_eq!(err.kind(), examine::error::ErrorKind::InvalidGrammar);
//! # Ok::<(), examine::error::ExamineError>(())
//! ```

use std::sync::Arc;

use log::{debug, warn};

use crate::analysis::{PerFieldAnalyzer, StandardAnalyzer};
use crate::error::{ExamineError, Result};
use crate::query::compiled::{CompiledQuery, FieldTarget};
use crate::query::compiler::QueryCompiler;
use crate::query::sort::SortField;
use crate::query::value::SearchValue;
use crate::query::{
    BooleanOperation, ID_FIELD, NODE_NAME_FIELD, NODE_TYPE_ALIAS_FIELD, PARENT_ID_FIELD,
    TypeFilter,
};

/// How a clause connects to everything before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
    AndNot,
}

impl From<BooleanOperation> for Joiner {
    fn from(operation: BooleanOperation) -> Self {
        match operation {
            BooleanOperation::And => Joiner::And,
            BooleanOperation::Or => Joiner::Or,
        }
    }
}

/// The operation inside a grouped sub-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperation {
    And,
    Or,
    /// None of the pairs may match; the group is joined with AND NOT.
    Not,
}

/// Marks the clauses that belong to one grouped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTag {
    pub id: u32,
    pub operation: GroupOperation,
}

/// One field/value condition and the joiner connecting it to its left neighbour.
///
/// Members of a group share a [`GroupTag`]; the first member carries the
/// joiner that connects the whole group.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: FieldTarget,
    pub value: SearchValue,
    pub joiner: Joiner,
    pub group: Option<GroupTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    AwaitingClause,
    ClauseAdded,
}

/// A fluent accumulator of query clauses.
///
/// Every call consumes the builder and hands it back, so a chain reads
/// top to bottom and a compiled criteria cannot be extended afterwards.
/// A builder is meant to be driven from one thread until it is compiled.
#[derive(Debug, Clone)]
pub struct Criteria {
    type_filter: TypeFilter,
    default_operation: BooleanOperation,
    clauses: Vec<Clause>,
    sort_fields: Vec<SortField>,
    state: BuilderState,
    pending: Option<Joiner>,
    next_group: u32,
    analyzer: Arc<PerFieldAnalyzer>,
}

impl Criteria {
    /// Create an empty criteria analyzing values with the standard analyzer.
    pub fn new(type_filter: TypeFilter, default_operation: BooleanOperation) -> Self {
        let analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        Self::with_analyzer(type_filter, default_operation, Arc::new(analyzer))
    }

    /// Create an empty criteria analyzing values the way an index does.
    pub fn with_analyzer(
        type_filter: TypeFilter,
        default_operation: BooleanOperation,
        analyzer: Arc<PerFieldAnalyzer>,
    ) -> Self {
        Criteria {
            type_filter,
            default_operation,
            clauses: Vec::new(),
            sort_fields: Vec::new(),
            state: BuilderState::AwaitingClause,
            pending: None,
            next_group: 0,
            analyzer,
        }
    }

    /// The document types this criteria is scoped to.
    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }

    /// The joiner used between clauses without an explicit one.
    pub fn default_operation(&self) -> BooleanOperation {
        self.default_operation
    }

    /// Clauses accumulated so far.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Sort keys accumulated so far, primary first.
    pub fn sort_fields(&self) -> &[SortField] {
        &self.sort_fields
    }

    /// Match `value` against the field `name`.
    pub fn field<N, V>(self, name: N, value: V) -> Result<Self>
    where
        N: Into<String>,
        V: Into<SearchValue>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(ExamineError::invalid_grammar("field name must not be empty"));
        }
        self.push_clause(FieldTarget::Named(name), value.into())
    }

    /// Match `value` against every field of the document.
    pub fn any_field<V: Into<SearchValue>>(self, value: V) -> Result<Self> {
        self.push_clause(FieldTarget::AllFields, value.into())
    }

    /// Shorthand for `field("type", value)`.
    pub fn node_type_alias<V: Into<SearchValue>>(self, value: V) -> Result<Self> {
        self.field(NODE_TYPE_ALIAS_FIELD, value)
    }

    /// Shorthand for `field("name", value)`.
    pub fn node_name<V: Into<SearchValue>>(self, value: V) -> Result<Self> {
        self.field(NODE_NAME_FIELD, value)
    }

    /// Shorthand for `field("id", value)`.
    pub fn id<V: Into<SearchValue>>(self, value: V) -> Result<Self> {
        self.field(ID_FIELD, value)
    }

    /// Shorthand for `field("parentID", value)`.
    pub fn parent_id<V: Into<SearchValue>>(self, value: V) -> Result<Self> {
        self.field(PARENT_ID_FIELD, value)
    }

    /// Join the next clause with AND.
    pub fn and(self) -> Result<Self> {
        self.set_joiner(Joiner::And, "and()")
    }

    /// Join the next clause with OR.
    pub fn or(self) -> Result<Self> {
        self.set_joiner(Joiner::Or, "or()")
    }

    /// Join the next clause with AND NOT.
    pub fn not(self) -> Result<Self> {
        self.set_joiner(Joiner::AndNot, "not()")
    }

    /// Add a group where every `(field, value)` pair must match.
    pub fn grouped_and<F, V>(
        self,
        fields: impl IntoIterator<Item = F>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        F: Into<String>,
        V: Into<SearchValue>,
    {
        self.push_group(GroupOperation::And, fields, values)
    }

    /// Add a group where any `(field, value)` pair may match.
    pub fn grouped_or<F, V>(
        self,
        fields: impl IntoIterator<Item = F>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        F: Into<String>,
        V: Into<SearchValue>,
    {
        self.push_group(GroupOperation::Or, fields, values)
    }

    /// Exclude documents where any `(field, value)` pair matches.
    ///
    /// Needs a preceding clause to subtract from, and acts as its own
    /// joiner: calling it right after `and()`, `or()` or `not()` fails.
    pub fn grouped_not<F, V>(
        self,
        fields: impl IntoIterator<Item = F>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        F: Into<String>,
        V: Into<SearchValue>,
    {
        self.push_group(GroupOperation::Not, fields, values)
    }

    /// Append an ascending sort key.
    pub fn order_by<S: Into<String>>(mut self, field: S) -> Self {
        self.sort_fields.push(SortField::asc(field));
        self
    }

    /// Append a descending sort key.
    pub fn order_by_descending<S: Into<String>>(mut self, field: S) -> Self {
        self.sort_fields.push(SortField::desc(field));
        self
    }

    /// Compile into an immutable query.
    ///
    /// A trailing `and()`/`or()` with no clause after it is discarded; a
    /// trailing `not()` is a dangling NOT and fails.
    pub fn compile(self) -> Result<CompiledQuery> {
        match self.pending {
            Some(Joiner::AndNot) => {
                return Err(ExamineError::invalid_grammar(
                    "not() must be followed by a clause",
                ));
            }
            Some(joiner) => {
                warn!("discarding trailing {joiner:?} joiner with no clause after it");
            }
            None => {}
        }

        let root = QueryCompiler::new(&self.analyzer).compile(&self.clauses)?;
        debug!(
            "compiled {} clause(s) for type filter {}",
            self.clauses.len(),
            self.type_filter
        );

        Ok(CompiledQuery::new(
            root,
            self.type_filter,
            self.default_operation,
            self.sort_fields,
        ))
    }

    fn set_joiner(mut self, joiner: Joiner, call: &str) -> Result<Self> {
        match self.state {
            BuilderState::AwaitingClause if self.clauses.is_empty() => {
                Err(ExamineError::invalid_grammar(format!(
                    "{call} called with no preceding clause"
                )))
            }
            BuilderState::AwaitingClause => Err(ExamineError::invalid_grammar(format!(
                "{call} called directly after another joiner"
            ))),
            BuilderState::ClauseAdded => {
                self.pending = Some(joiner);
                self.state = BuilderState::AwaitingClause;
                Ok(self)
            }
        }
    }

    /// Resolve the joiner for the clause about to be appended.
    fn take_joiner(&mut self) -> Joiner {
        self.pending
            .take()
            .unwrap_or_else(|| self.default_operation.into())
    }

    fn push_clause(mut self, field: FieldTarget, value: SearchValue) -> Result<Self> {
        value.validate()?;
        let joiner = self.take_joiner();
        self.clauses.push(Clause {
            field,
            value,
            joiner,
            group: None,
        });
        self.state = BuilderState::ClauseAdded;
        Ok(self)
    }

    fn push_group<F, V>(
        mut self,
        operation: GroupOperation,
        fields: impl IntoIterator<Item = F>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        F: Into<String>,
        V: Into<SearchValue>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let values: Vec<SearchValue> = values.into_iter().map(Into::into).collect();

        if fields.len() != values.len() {
            return Err(ExamineError::arity_mismatch(fields.len(), values.len()));
        }
        if fields.is_empty() {
            return Err(ExamineError::invalid_grammar(
                "grouped operation needs at least one field/value pair",
            ));
        }
        if let Some(empty) = fields.iter().position(|f| f.is_empty()) {
            return Err(ExamineError::invalid_grammar(format!(
                "field name at position {empty} must not be empty"
            )));
        }
        for value in &values {
            value.validate()?;
        }

        let joiner = if operation == GroupOperation::Not {
            if self.clauses.is_empty() {
                return Err(ExamineError::invalid_grammar(
                    "grouped_not() called with no preceding clause",
                ));
            }
            if let Some(pending) = self.pending {
                let call = match pending {
                    Joiner::And => "and()",
                    Joiner::Or => "or()",
                    Joiner::AndNot => "not()",
                };
                return Err(ExamineError::invalid_grammar(format!(
                    "grouped_not() is its own joiner and cannot follow {call}"
                )));
            }
            Joiner::AndNot
        } else {
            self.take_joiner()
        };

        let tag = GroupTag {
            id: self.next_group,
            operation,
        };
        self.next_group += 1;

        let member_joiner = match operation {
            GroupOperation::And => Joiner::And,
            GroupOperation::Or | GroupOperation::Not => Joiner::Or,
        };
        for (i, (field, value)) in fields.into_iter().zip(values).enumerate() {
            self.clauses.push(Clause {
                field: FieldTarget::Named(field),
                value,
                joiner: if i == 0 { joiner } else { member_joiner },
                group: Some(tag),
            });
        }
        self.state = BuilderState::ClauseAdded;
        Ok(self)
    }
}
