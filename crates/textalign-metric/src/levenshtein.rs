use std::hash::Hash;

use crate::{empty_score, SimilarityMetric};

/// Unit-cost insert/delete/substitute distance, two-row dynamic programming.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    // Keep the shorter input on the row axis.
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, x) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(x != y);
            let delete = prev[j + 1] + 1;
            let insert = cur[j] + 1;
            cur[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl SimilarityMetric for Levenshtein {
    fn score<T: Eq + Hash>(&self, a: &[T], b: &[T]) -> f64 {
        if let Some(score) = empty_score(a.len(), b.len()) {
            return score;
        }
        let longest = a.len().max(b.len());
        1.0 - edit_distance(a, b) as f64 / longest as f64
    }
}
