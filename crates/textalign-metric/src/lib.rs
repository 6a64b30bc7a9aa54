//! textalign-metric
//!
//! Similarity scores between two unit sequences (characters or words),
//! normalized to `[0, 1]` where `1` is a perfect match.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use textalign_core::error::{Error, Result};

mod gestalt;
mod hamming;
mod levenshtein;

pub use gestalt::GestaltRatio;
pub use hamming::Hamming;
pub use levenshtein::{edit_distance, Levenshtein};

pub trait SimilarityMetric {
    fn score<T: Eq + Hash>(&self, a: &[T], b: &[T]) -> f64;
}

/// Score for inputs where at least one side is empty, `None` otherwise.
pub(crate) fn empty_score(a_len: usize, b_len: usize) -> Option<f64> {
    match (a_len, b_len) {
        (0, 0) => Some(1.0),
        (0, _) | (_, 0) => Some(0.0),
        _ => None,
    }
}

/// Closed set of metrics selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// Positional comparison; O(n).
    #[default]
    Hamming,
    /// Unit-cost edit distance; O(n·m).
    Levenshtein,
    /// Ratcliff/Obershelp pattern matching.
    GestaltRatio,
}

impl Metric {
    pub fn score<T: Eq + Hash>(self, a: &[T], b: &[T]) -> f64 {
        match self {
            Metric::Hamming => Hamming.score(a, b),
            Metric::Levenshtein => Levenshtein.score(a, b),
            Metric::GestaltRatio => GestaltRatio.score(a, b),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hamming" => Ok(Metric::Hamming),
            "levenshtein" => Ok(Metric::Levenshtein),
            "ratio" | "ratcliff" | "gestalt" => Ok(Metric::GestaltRatio),
            other => Err(Error::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Hamming => "hamming",
            Metric::Levenshtein => "levenshtein",
            Metric::GestaltRatio => "ratio",
        })
    }
}
