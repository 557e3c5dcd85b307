//! Evaluation of a query tree against one document.
//!
//! Every predicate kind is handled by a single match in
//! [`Matcher::match_field`]; a node evaluates to `Some(score)` when the
//! document matches and `None` when it does not.

use crate::index::{IndexSnapshot, IndexedDocument, IndexedField};
use crate::query::{FieldTarget, Leaf, Predicate, QueryNode, TermMatcher};
use crate::search::scorer::{BM25Scorer, TermStats};
use crate::util::FuzzyTerm;

/// Score given to a wildcard match, before boosting.
const WILDCARD_SCORE: f32 = 1.0;

/// Evaluates query nodes against documents of one snapshot.
#[derive(Debug)]
pub struct Matcher<'a> {
    snapshot: &'a IndexSnapshot,
    scorer: &'a BM25Scorer,
    max_fuzzy_edits: u32,
}

impl<'a> Matcher<'a> {
    pub fn new(snapshot: &'a IndexSnapshot, scorer: &'a BM25Scorer, max_fuzzy_edits: u32) -> Self {
        Matcher {
            snapshot,
            scorer,
            max_fuzzy_edits,
        }
    }

    /// Score `document` against `node`, or `None` if it does not match.
    pub fn evaluate(&self, node: &QueryNode, document: &IndexedDocument) -> Option<f32> {
        match node {
            QueryNode::Leaf(leaf) => self.evaluate_leaf(leaf, document),
            QueryNode::And(children) => {
                let mut score = 0.0;
                for child in children {
                    match child {
                        QueryNode::Not(excluded) => {
                            if self.evaluate(excluded, document).is_some() {
                                return None;
                            }
                        }
                        _ => score += self.evaluate(child, document)?,
                    }
                }
                Some(score)
            }
            QueryNode::Or(children) => children
                .iter()
                .filter_map(|child| self.evaluate(child, document))
                .reduce(|a, b| a + b),
            QueryNode::Not(excluded) => match self.evaluate(excluded, document) {
                Some(_) => None,
                None => Some(0.0),
            },
        }
    }

    fn evaluate_leaf(&self, leaf: &Leaf, document: &IndexedDocument) -> Option<f32> {
        let score = match &leaf.field {
            FieldTarget::Named(name) => {
                let field = document.field(name)?;
                self.match_field(name, field, &leaf.predicate)?
            }
            FieldTarget::AllFields => document
                .fields()
                .filter_map(|(name, field)| self.match_field(name, field, &leaf.predicate))
                .reduce(|a, b| a + b)?,
        };
        Some(score * leaf.boost)
    }

    fn match_field(&self, name: &str, field: &IndexedField, predicate: &Predicate) -> Option<f32> {
        match predicate {
            Predicate::Term { term } => {
                let freq = field.term_freq(term);
                (freq > 0).then(|| self.term_score(name, field, term, freq as f32))
            }
            Predicate::Phrase { terms } => {
                let lists = terms
                    .iter()
                    .map(|t| field.positions(t))
                    .collect::<Option<Vec<_>>>()?;
                self.phrase_score(name, field, terms, &lists)
            }
            Predicate::Proximity { terms, distance } => {
                let mut distinct: Vec<&TermMatcher> = Vec::with_capacity(terms.len());
                for matcher in terms {
                    if !distinct.contains(&matcher) {
                        distinct.push(matcher);
                    }
                }
                let (lists, scores): (Vec<Vec<u32>>, Vec<f32>) = distinct
                    .iter()
                    .map(|m| self.occurrences(name, field, m))
                    .collect::<Option<Vec<_>>>()?
                    .into_iter()
                    .unzip();
                let slop = min_slop(&lists)?;
                if slop > *distance {
                    return None;
                }
                Some(scores.iter().sum::<f32>() / (1.0 + slop as f32))
            }
            Predicate::Wildcard { pattern } => field
                .terms()
                .any(|t| pattern.matches(t))
                .then_some(WILDCARD_SCORE),
            Predicate::Fuzzy { term, max_edits } => self
                .fuzzy_matches(name, field, term, *max_edits)
                .map(|(_, score)| score)
                .reduce(f32::max),
            Predicate::Literal { text, terms } => {
                if !field.folded().contains(&text.to_lowercase()) {
                    return None;
                }
                if terms.is_empty() {
                    return Some(WILDCARD_SCORE);
                }
                let lists = terms
                    .iter()
                    .map(|t| {
                        let folded = t.to_lowercase();
                        merged_positions(field, |candidate| candidate.to_lowercase() == folded)
                    })
                    .collect::<Option<Vec<_>>>()?;
                self.phrase_score(name, field, terms, &lists)
            }
            Predicate::Nothing => None,
        }
    }

    /// Positions `matcher` fills in `field`, with the score it contributes.
    fn occurrences(
        &self,
        name: &str,
        field: &IndexedField,
        matcher: &TermMatcher,
    ) -> Option<(Vec<u32>, f32)> {
        match matcher {
            TermMatcher::Exact(term) => {
                let positions = field.positions(term)?;
                let score = self.term_score(name, field, term, positions.len() as f32);
                Some((positions.to_vec(), score))
            }
            TermMatcher::Pattern(pattern) => {
                merged_positions(field, |t| pattern.matches(t)).map(|p| (p, WILDCARD_SCORE))
            }
            TermMatcher::Fuzzy { term, max_edits } => {
                let mut positions = Vec::new();
                let mut best: Option<f32> = None;
                for (candidate, score) in self.fuzzy_matches(name, field, term, *max_edits) {
                    positions.extend_from_slice(field.positions(candidate).unwrap_or_default());
                    best = Some(best.map_or(score, |b| b.max(score)));
                }
                positions.sort_unstable();
                best.map(|score| (positions, score))
            }
        }
    }

    /// Field terms within the edit budget, each scored down by its edits.
    fn fuzzy_matches<'f>(
        &'f self,
        name: &'f str,
        field: &'f IndexedField,
        term: &'f str,
        max_edits: u32,
    ) -> impl Iterator<Item = (&'f str, f32)> + 'f {
        let fuzzy = FuzzyTerm::new(term, max_edits.min(self.max_fuzzy_edits));
        field.terms().filter_map(move |candidate| {
            let edits = fuzzy.distance(candidate)?;
            let score = self.term_score(name, field, candidate, field.term_freq(candidate) as f32);
            Some((candidate, score / (1.0 + edits as f32)))
        })
    }

    fn phrase_score<P: AsRef<[u32]>>(
        &self,
        name: &str,
        field: &IndexedField,
        terms: &[String],
        lists: &[P],
    ) -> Option<f32> {
        let freq = phrase_freq(lists);
        if freq == 0 {
            return None;
        }
        Some(
            terms
                .iter()
                .map(|t| self.term_score(name, field, t, freq as f32))
                .sum(),
        )
    }

    fn term_score(&self, name: &str, field: &IndexedField, term: &str, term_freq: f32) -> f32 {
        self.scorer.score(TermStats {
            term_freq,
            doc_freq: self.snapshot.doc_freq(name, term),
            field_length: field.length(),
            avg_field_length: self.snapshot.field_stats(name).avg_length(),
            total_docs: self.snapshot.len() as u64,
        })
    }
}

/// Sorted positions of every term in `field` accepted by `accept`, or
/// `None` if no term is.
fn merged_positions(field: &IndexedField, accept: impl Fn(&str) -> bool) -> Option<Vec<u32>> {
    let mut positions: Vec<u32> = field
        .terms()
        .filter(|t| accept(t))
        .filter_map(|t| field.positions(t))
        .flatten()
        .copied()
        .collect();
    if positions.is_empty() {
        return None;
    }
    positions.sort_unstable();
    Some(positions)
}

/// Number of places where the position lists line up consecutively, in order.
fn phrase_freq<P: AsRef<[u32]>>(lists: &[P]) -> usize {
    let Some((first, rest)) = lists.split_first() else {
        return 0;
    };

    first
        .as_ref()
        .iter()
        .filter(|&&start| {
            rest.iter().enumerate().all(|(i, positions)| {
                positions
                    .as_ref()
                    .binary_search(&(start + i as u32 + 1))
                    .is_ok()
            })
        })
        .count()
}

/// Smallest number of extra words separating one position from each list,
/// in any order.
///
/// A window spanning positions `min..=max` that holds every list has slop
/// `(max - min) - (lists - 1)`; adjacent terms have slop 0.
fn min_slop<P: AsRef<[u32]>>(lists: &[P]) -> Option<u32> {
    let mut occurrences: Vec<(u32, usize)> = Vec::new();
    for (i, positions) in lists.iter().enumerate() {
        occurrences.extend(positions.as_ref().iter().map(|&p| (p, i)));
    }
    occurrences.sort_unstable();

    let mut counts = vec![0usize; lists.len()];
    let mut covered = 0;
    let mut left = 0;
    let mut best: Option<u32> = None;

    for right in 0..occurrences.len() {
        let list = occurrences[right].1;
        if counts[list] == 0 {
            covered += 1;
        }
        counts[list] += 1;

        while covered == lists.len() {
            let span = occurrences[right].0 - occurrences[left].0;
            best = Some(best.map_or(span, |b| b.min(span)));

            let dropped = occurrences[left].1;
            counts[dropped] -= 1;
            if counts[dropped] == 0 {
                covered -= 1;
            }
            left += 1;
        }
    }

    best.map(|span| span.saturating_sub(lists.len() as u32 - 1))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::{KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};
    use crate::query::WildcardPattern;

    fn field(text: &str) -> IndexedField {
        let analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        IndexedField::analyze("body", text.to_string(), &analyzer).unwrap()
    }

    fn lists<'f>(f: &'f IndexedField, terms: &[&str]) -> Vec<&'f [u32]> {
        terms.iter().filter_map(|t| f.positions(t)).collect()
    }

    #[test]
    fn test_phrase_freq() {
        let f = field("warren creative and warren creative again");
        assert_eq!(phrase_freq(&lists(&f, &["warren", "creative"])), 2);
        assert_eq!(phrase_freq(&lists(&f, &["creative", "warren"])), 0);
        assert_eq!(phrase_freq::<&[u32]>(&[]), 0);
    }

    #[test]
    fn test_min_slop_any_order() {
        let f = field("creative agency run by warren");
        assert_eq!(min_slop(&lists(&f, &["warren", "creative"])), Some(3));
        assert_eq!(min_slop(&lists(&f, &["creative", "agency"])), Some(0));
        assert_eq!(min_slop(&[vec![1], Vec::new()]), None);
    }

    #[test]
    fn test_merged_positions() {
        let f = field("warren buckley warrior warren");
        assert_eq!(
            merged_positions(&f, |t| t.starts_with("warr")),
            Some(vec![0, 2, 3])
        );
        assert_eq!(merged_positions(&f, |t| t == "nobody"), None);
    }

    fn leaf(predicate: Predicate, boost: f32) -> QueryNode {
        QueryNode::Leaf(Leaf::new(FieldTarget::Named("body".into()), predicate, boost))
    }

    #[test]
    fn test_evaluate_boolean_nodes() {
        let analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        let mut snapshot = IndexSnapshot::new();
        let document = crate::document::Document::builder()
            .add_text("body", "umbraco cms")
            .build();
        snapshot.append([("content", document)], &analyzer).unwrap();
        let indexed = Arc::clone(snapshot.documents().next().unwrap());

        let scorer = BM25Scorer::default();
        let matcher = Matcher::new(&snapshot, &scorer, 2);
        let term = |t: &str| Predicate::Term { term: t.into() };

        let hit = leaf(term("umbraco"), 1.0);
        let miss = leaf(term("drupal"), 1.0);

        assert!(matcher.evaluate(&hit, &indexed).is_some());
        assert!(matcher.evaluate(&miss, &indexed).is_none());
        assert!(
            matcher
                .evaluate(&QueryNode::Or(vec![hit.clone(), miss.clone()]), &indexed)
                .is_some()
        );
        assert!(
            matcher
                .evaluate(&QueryNode::And(vec![hit.clone(), miss.clone()]), &indexed)
                .is_none()
        );
        let excluded = QueryNode::And(vec![hit.clone(), QueryNode::Not(Box::new(hit.clone()))]);
        assert!(matcher.evaluate(&excluded, &indexed).is_none());

        let plain = matcher.evaluate(&hit, &indexed).unwrap();
        let boosted = matcher.evaluate(&leaf(term("umbraco"), 10.0), &indexed).unwrap();
        assert!(boosted > plain);

        let pattern = WildcardPattern::new("UMB*").unwrap();
        assert!(
            matcher
                .evaluate(&leaf(Predicate::Wildcard { pattern }, 1.0), &indexed)
                .is_some()
        );
        let fuzzy = Predicate::Fuzzy {
            term: "umbrco".into(),
            max_edits: 1,
        };
        assert!(matcher.evaluate(&leaf(fuzzy, 1.0), &indexed).is_some());
    }

    #[test]
    fn test_proximity_slots_and_caseless_literal() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()));
        analyzer.add_analyzer("code", Arc::new(KeywordAnalyzer::new()));
        let mut snapshot = IndexSnapshot::new();
        let document = crate::document::Document::builder()
            .add_text("body", "Warren Buckley creative agency")
            .add_text("code", "A+B")
            .build();
        snapshot.append([("content", document)], &analyzer).unwrap();
        let indexed = Arc::clone(snapshot.documents().next().unwrap());

        let scorer = BM25Scorer::default();
        let matcher = Matcher::new(&snapshot, &scorer, 2);
        let proximity = |terms: Vec<TermMatcher>, distance| {
            leaf(Predicate::Proximity { terms, distance }, 1.0)
        };
        let pattern = |p: &str| TermMatcher::Pattern(WildcardPattern::new(p).unwrap());
        let exact = |t: &str| TermMatcher::Exact(t.to_string());

        let near = proximity(vec![pattern("warr*"), exact("creative")], 1);
        assert!(matcher.evaluate(&near, &indexed).is_some());
        let too_far = proximity(vec![pattern("warr*"), exact("creative")], 0);
        assert!(matcher.evaluate(&too_far, &indexed).is_none());

        let fuzzy = TermMatcher::Fuzzy {
            term: "buckly".into(),
            max_edits: 1,
        };
        let near = proximity(vec![fuzzy, exact("agency")], 1);
        assert!(matcher.evaluate(&near, &indexed).is_some());

        let literal = Predicate::Literal {
            text: "a+b".into(),
            terms: vec!["a+b".into()],
        };
        let node = QueryNode::Leaf(Leaf::new(FieldTarget::Named("code".into()), literal, 1.0));
        assert!(matcher.evaluate(&node, &indexed).is_some());
    }
}
