//! Translates accumulated clauses into a [`QueryNode`] tree.
//!
//! Clauses fold left to right. A run of clauses sharing a group tag is
//! compiled into one sub-expression first, so groups bind tighter than the
//! top-level joiners. `AND NOT` never stands alone: it wraps its operand in
//! [`QueryNode::Not`] and conjoins it with everything folded so far.

use log::trace;

use crate::analysis::PerFieldAnalyzer;
use crate::error::{ExamineError, Result};
use crate::query::compiled::{FieldTarget, Leaf, Predicate, QueryNode, TermMatcher};
use crate::query::criteria::{Clause, GroupOperation, Joiner};
use crate::query::value::{SearchValue, has_wildcard, unescape_text};
use crate::query::wildcard::WildcardPattern;

/// Compiles clauses using the analyzers their fields are indexed with.
pub struct QueryCompiler<'a> {
    analyzer: &'a PerFieldAnalyzer,
}

/// The running left fold. `op` records which joiner built `node`, so that
/// only nodes the fold itself created are extended in place.
struct Folded {
    node: QueryNode,
    op: Option<Joiner>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(analyzer: &'a PerFieldAnalyzer) -> Self {
        QueryCompiler { analyzer }
    }

    /// Compile `clauses` into a tree. No clauses yields `None`.
    pub fn compile(&self, clauses: &[Clause]) -> Result<Option<QueryNode>> {
        let mut folded: Option<Folded> = None;

        let mut rest = clauses;
        while let Some(first) = rest.first() {
            let run = match first.group {
                Some(tag) => rest
                    .iter()
                    .take_while(|c| c.group.map(|t| t.id) == Some(tag.id))
                    .count(),
                None => 1,
            };
            let (unit, tail) = rest.split_at(run);
            rest = tail;

            let node = self.compile_unit(unit)?;
            folded = Some(match folded {
                None if first.joiner == Joiner::AndNot => {
                    return Err(ExamineError::invalid_grammar(
                        "NOT needs a preceding clause to subtract from",
                    ));
                }
                None => Folded { node, op: None },
                Some(acc) => Self::join(acc, first.joiner, node),
            });
        }

        Ok(folded.map(|f| f.node))
    }

    fn join(acc: Folded, joiner: Joiner, node: QueryNode) -> Folded {
        let (op, operand) = match joiner {
            Joiner::AndNot => (Joiner::And, QueryNode::Not(Box::new(node))),
            other => (other, node),
        };

        let node = match (acc.op, acc.node) {
            (Some(prev), QueryNode::And(mut children)) if prev == op && op == Joiner::And => {
                children.push(operand);
                QueryNode::And(children)
            }
            (Some(prev), QueryNode::Or(mut children)) if prev == op && op == Joiner::Or => {
                children.push(operand);
                QueryNode::Or(children)
            }
            (_, left) if op == Joiner::And => QueryNode::And(vec![left, operand]),
            (_, left) => QueryNode::Or(vec![left, operand]),
        };

        Folded { node, op: Some(op) }
    }

    /// Compile a single clause or one group of clauses.
    fn compile_unit(&self, unit: &[Clause]) -> Result<QueryNode> {
        let mut nodes = unit
            .iter()
            .map(|clause| self.compile_clause(&clause.field, &clause.value))
            .collect::<Result<Vec<_>>>()?;

        let operation = unit.first().and_then(|c| c.group).map(|t| t.operation);
        Ok(match operation {
            _ if nodes.len() == 1 => nodes.remove(0),
            Some(GroupOperation::And) => QueryNode::And(nodes),
            _ => QueryNode::Or(nodes),
        })
    }

    /// Compile one field/value pair into a leaf, or a conjunction of leaves
    /// when the value expands to several independent predicates.
    pub fn compile_clause(&self, field: &FieldTarget, value: &SearchValue) -> Result<QueryNode> {
        let boost = value.boost().unwrap_or(1.0);
        let predicates = self.predicates(field, value)?;
        trace!("{field}: {:?} -> {} predicate(s)", value.text(), predicates.len());

        let mut leaves: Vec<QueryNode> = predicates
            .into_iter()
            .map(|predicate| QueryNode::Leaf(Leaf::new(field.clone(), predicate, boost)))
            .collect();

        Ok(if leaves.len() == 1 {
            leaves.remove(0)
        } else {
            QueryNode::And(leaves)
        })
    }

    fn predicates(&self, field: &FieldTarget, value: &SearchValue) -> Result<Vec<Predicate>> {
        let text = value.text();

        if value.is_escaped() {
            if text.is_empty() {
                return Ok(vec![Predicate::Nothing]);
            }
            let terms = self.terms(field, text)?;
            if let Some(distance) = value.proximity() {
                let slots = terms.into_iter().map(TermMatcher::Exact).collect();
                return Ok(vec![Self::proximity_predicate(slots, distance)]);
            }
            return Ok(vec![Predicate::Literal {
                text: text.to_string(),
                terms,
            }]);
        }

        if let Some(distance) = value.proximity() {
            let slots = self.slots(field, value)?;
            return Ok(vec![Self::proximity_predicate(slots, distance)]);
        }

        if value.is_wildcarded() {
            let mut predicates = Vec::new();
            for word in text.split_whitespace() {
                if has_wildcard(word) {
                    predicates.push(Predicate::Wildcard {
                        pattern: WildcardPattern::new(word)?,
                    });
                } else {
                    predicates.push(Self::text_predicate(
                        self.terms(field, &unescape_text(word))?,
                    ));
                }
            }
            if predicates.is_empty() {
                predicates.push(Predicate::Nothing);
            }
            return Ok(predicates);
        }

        if let Some(max_edits) = value.fuzzy() {
            let terms = self.terms(field, &unescape_text(text))?;
            if terms.is_empty() {
                return Ok(vec![Predicate::Nothing]);
            }
            return Ok(terms
                .into_iter()
                .map(|term| Predicate::Fuzzy { term, max_edits })
                .collect());
        }

        Ok(vec![Self::text_predicate(
            self.terms(field, &unescape_text(text))?,
        )])
    }

    /// The proximity slots of an unescaped value, in text order. Wildcard
    /// words become patterns; other terms are exact, or fuzzy when the value
    /// carries an edit budget.
    fn slots(&self, field: &FieldTarget, value: &SearchValue) -> Result<Vec<TermMatcher>> {
        let term_slot = |term: String| match value.fuzzy() {
            Some(max_edits) => TermMatcher::Fuzzy { term, max_edits },
            None => TermMatcher::Exact(term),
        };

        if !value.is_wildcarded() {
            let terms = self.terms(field, &unescape_text(value.text()))?;
            return Ok(terms.into_iter().map(&term_slot).collect());
        }

        let mut slots = Vec::new();
        for word in value.text().split_whitespace() {
            if has_wildcard(word) {
                slots.push(TermMatcher::Pattern(WildcardPattern::new(word)?));
            } else {
                slots.extend(
                    self.terms(field, &unescape_text(word))?
                        .into_iter()
                        .map(&term_slot),
                );
            }
        }
        Ok(slots)
    }

    /// A single slot is trivially within any distance of itself, so it
    /// compiles to the plain predicate for that slot.
    fn proximity_predicate(mut slots: Vec<TermMatcher>, distance: u32) -> Predicate {
        match slots.len() {
            0 => Predicate::Nothing,
            1 => match slots.remove(0) {
                TermMatcher::Exact(term) => Predicate::Term { term },
                TermMatcher::Pattern(pattern) => Predicate::Wildcard { pattern },
                TermMatcher::Fuzzy { term, max_edits } => Predicate::Fuzzy { term, max_edits },
            },
            _ => Predicate::Proximity {
                terms: slots,
                distance,
            },
        }
    }

    fn text_predicate(mut terms: Vec<String>) -> Predicate {
        match terms.len() {
            0 => Predicate::Nothing,
            1 => Predicate::Term {
                term: terms.remove(0),
            },
            _ => Predicate::Phrase { terms },
        }
    }

    fn terms(&self, field: &FieldTarget, text: &str) -> Result<Vec<String>> {
        match field {
            FieldTarget::Named(name) => self.analyzer.field_terms(name, text),
            FieldTarget::AllFields => self.analyzer.default_analyzer().terms(text),
        }
    }
}
