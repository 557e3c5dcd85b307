//! Bounded Levenshtein distance for fuzzy term matching.

use std::cmp::min;

/// Distance between `s1` and `s2`, or `None` once it is known to exceed
/// `threshold`. Works on chars, not bytes.
#[allow(clippy::needless_range_loop)]
pub fn levenshtein_distance_threshold(s1: &[char], s2: &[char], threshold: usize) -> Option<usize> {
    let (len1, len2) = (s1.len(), s2.len());

    if len1.abs_diff(len2) > threshold {
        return None;
    }
    if len1 == 0 || len2 == 0 {
        return Some(len1.max(len2));
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;
        let mut row_min = i;

        for j in 1..=len2 {
            let cost = usize::from(s1[i - 1] != s2[j - 1]);
            curr_row[j] = min(
                min(prev_row[j] + 1, curr_row[j - 1] + 1),
                prev_row[j - 1] + cost,
            );
            row_min = min(row_min, curr_row[j]);
        }

        if row_min > threshold {
            return None;
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    Some(prev_row[len2]).filter(|&d| d <= threshold)
}

/// A query term prepared for repeated comparison against indexed terms.
///
/// Comparison ignores case.
#[derive(Debug, Clone)]
pub struct FuzzyTerm {
    chars: Vec<char>,
    max_edits: usize,
}

impl FuzzyTerm {
    pub fn new(term: &str, max_edits: u32) -> Self {
        FuzzyTerm {
            chars: term.to_lowercase().chars().collect(),
            max_edits: max_edits as usize,
        }
    }

    /// Edits needed to turn `candidate` into this term, if within the limit.
    pub fn distance(&self, candidate: &str) -> Option<u32> {
        let candidate: Vec<char> = candidate.to_lowercase().chars().collect();
        levenshtein_distance_threshold(&self.chars, &candidate, self.max_edits).map(|d| d as u32)
    }
}
