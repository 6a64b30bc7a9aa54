use std::hash::Hash;

use crate::{empty_score, SimilarityMetric};

/// Fraction of aligned positions that agree.
///
/// When the lengths differ, every unit past the shorter input counts as a
/// mismatch and the score is taken over the longer length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

impl SimilarityMetric for Hamming {
    fn score<T: Eq + Hash>(&self, a: &[T], b: &[T]) -> f64 {
        if let Some(score) = empty_score(a.len(), b.len()) {
            return score;
        }
        let longest = a.len().max(b.len());
        let excess = longest - a.len().min(b.len());
        let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count() + excess;
        1.0 - mismatches as f64 / longest as f64
    }
}
