use crate::types::{AlignmentRecord, ReferenceText};

/// Supplies the full reference text for a document key.
pub trait ReferenceStore: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<ReferenceText>;
}

/// Receives one row per processed fragment.
pub trait ResultSink {
    fn write_record(&mut self, record: &AlignmentRecord) -> anyhow::Result<()>;
    fn flush(&mut self) -> anyhow::Result<()>;
}
