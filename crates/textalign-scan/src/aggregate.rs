use std::cmp::Ordering;

use textalign_core::error::{Error, Result};

use crate::pool::WorkerResult;
use crate::scanner::WindowHit;

/// The winning window and the partition that found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestHit {
    pub partition: usize,
    pub hit: WindowHit,
}

/// `Greater` when `a` should win over `b`: real windows before empty ones,
/// then higher score, then smaller end offset, then lower partition index.
fn rank(a: &BestHit, b: &BestHit) -> Ordering {
    (!a.hit.is_empty())
        .cmp(&!b.hit.is_empty())
        .then(a.hit.score.total_cmp(&b.hit.score))
        .then(b.hit.end.cmp(&a.hit.end))
        .then(b.partition.cmp(&a.partition))
}

/// Reduces per-partition results to a single winner. Failed workers are
/// skipped; the result does not depend on the order of `results`.
pub fn aggregate(results: &[WorkerResult]) -> Result<BestHit> {
    results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|hit| BestHit { partition: r.partition, hit: *hit }))
        .max_by(rank)
        .ok_or(Error::NoAlignmentFound)
}
