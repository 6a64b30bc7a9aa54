use std::collections::HashMap;
use std::hash::Hash;

use crate::{empty_score, SimilarityMetric};

/// Ratcliff/Obershelp ratio: `2 * matched / (len(a) + len(b))`, where
/// `matched` sums the longest common block and, recursively, the blocks
/// found to its left and right.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestaltRatio;

impl SimilarityMetric for GestaltRatio {
    fn score<T: Eq + Hash>(&self, a: &[T], b: &[T]) -> f64 {
        if let Some(score) = empty_score(a.len(), b.len()) {
            return score;
        }
        let matched = matched_units(a, b);
        2.0 * matched as f64 / (a.len() + b.len()) as f64
    }
}

/// Longest common block inside `a[alo..ahi]` x `b[blo..bhi]`.
///
/// Returns `(i, j, size)`; among equally long blocks the one starting
/// earliest in `a` wins, then earliest in `b`.
fn longest_block<T: Eq + Hash>(
    a: &[T],
    index: &HashMap<&T, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j - blo] = length of the common run ending at (i, j).
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];
    let mut prev_touched: Vec<usize> = Vec::new();
    let mut cur_touched: Vec<usize> = Vec::new();

    for (i, unit) in a.iter().enumerate().take(ahi).skip(alo) {
        if let Some(positions) = index.get(unit) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > blo { prev[j - blo - 1] } else { 0 } + 1;
                cur[j - blo] = k;
                cur_touched.push(j - blo);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        for &t in &prev_touched {
            prev[t] = 0;
        }
        prev_touched.clear();
        std::mem::swap(&mut prev, &mut cur);
        std::mem::swap(&mut prev_touched, &mut cur_touched);
    }
    (best_i, best_j, best_size)
}

/// Total size of the matching blocks between `a` and `b`.
pub(crate) fn matched_units<T: Eq + Hash>(a: &[T], b: &[T]) -> usize {
    let mut index: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, unit) in b.iter().enumerate() {
        index.entry(unit).or_default().push(j);
    }

    let mut total = 0;
    // Explicit work list instead of recursion; long inputs would otherwise
    // recurse once per block.
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, size) = longest_block(a, &index, (alo, ahi), (blo, bhi));
        if size == 0 {
            continue;
        }
        total += size;
        pending.push(((alo, i), (blo, j)));
        pending.push(((i + size, ahi), (j + size, bhi)));
    }
    total
}
