//! textalign-engine
//!
//! Public entry point: partitions the search region, scans it in parallel,
//! aggregates the winner and tracks the sequenced-search offset.

pub mod engine;
pub mod sequencing;

pub use engine::{AlignmentEngine, EngineOptions};
pub use sequencing::SequencingState;
