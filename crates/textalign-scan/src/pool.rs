use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};

use textalign_core::error::{Error, Result};
use textalign_core::types::Partition;

use crate::scanner::WindowHit;

/// Outcome of one partition's scan.
#[derive(Debug)]
pub struct WorkerResult {
    pub partition: usize,
    pub outcome: Result<WindowHit>,
}

impl WorkerResult {
    pub fn is_ok(&self) -> bool { self.outcome.is_ok() }

    pub fn timed_out(&self) -> bool { matches!(self.outcome, Err(Error::ScanTimeout)) }
}

/// Threads for a pool running `partitions` scans: one per partition, but
/// never more than the machine can run at once. Extra partitions queue on
/// the same threads.
pub fn pool_threads(partitions: usize) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    partitions.clamp(1, cores)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Runs `scan` once per partition on a pool of `pool_threads` threads and
/// blocks until every worker is done.
///
/// The pool lives for this call only. Errors and panics are confined to the
/// worker that raised them and reported in its `WorkerResult`; results come
/// back in partition order.
pub fn run_all<F>(partitions: &[Partition], scan: F) -> Vec<WorkerResult>
where
    F: Fn(&Partition) -> Result<WindowHit> + Sync,
{
    let run_one = |p: &Partition| {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| scan(p))) {
            Ok(Ok(hit)) => Ok(hit),
            Ok(Err(Error::ScanTimeout)) => Err(Error::ScanTimeout),
            Ok(Err(e)) => Err(Error::WorkerFailure { partition: p.index, reason: e.to_string() }),
            Err(payload) => Err(Error::WorkerFailure { partition: p.index, reason: panic_message(payload.as_ref()) }),
        };
        if let Err(e) = &outcome {
            tracing::warn!(partition = p.index, error = %e, "scan worker failed");
        }
        WorkerResult { partition: p.index, outcome }
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_threads(partitions.len()))
        .thread_name(|i| format!("textalign-scan-{}", i))
        .build();
    match pool {
        Ok(pool) => pool.install(|| partitions.par_iter().map(run_one).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "could not start scan workers");
            partitions
                .iter()
                .map(|p| WorkerResult {
                    partition: p.index,
                    outcome: Err(Error::WorkerFailure { partition: p.index, reason: e.to_string() }),
                })
                .collect()
        }
    }
}
