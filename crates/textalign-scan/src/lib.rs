//! textalign-scan
//!
//! Sliding-window search over a reference text, split across workers.
//! `partition` divides a region, `pool::run_all` scans each share in
//! parallel and `aggregate` picks the global winner.

pub mod aggregate;
pub mod partition;
pub mod pool;
pub mod scanner;

pub use aggregate::{aggregate, BestHit};
pub use partition::partition;
pub use pool::{pool_threads, run_all, WorkerResult};
pub use scanner::{scan, scan_units, Deadline, QueryUnits, WindowHit};
