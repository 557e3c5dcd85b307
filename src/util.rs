//! Utility modules for Examine.

pub mod levenshtein;

pub use levenshtein::FuzzyTerm;
