use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("query is empty")]
    EmptyQuery,

    #[error("reference text is empty")]
    EmptyReference,

    #[error("unknown similarity metric '{0}' (expected hamming, levenshtein or ratio)")]
    InvalidMetric(String),

    #[error("unknown granularity '{0}' (expected char or word)")]
    InvalidGranularity(String),

    #[error("cannot partition region of length {region_len} across {workers} workers")]
    InvalidPartitionRequest { region_len: usize, workers: usize },

    #[error("region [{start}, {end}) exceeds reference length {len}")]
    RegionOutOfBounds { start: usize, end: usize, len: usize },

    #[error("worker {partition} failed: {reason}")]
    WorkerFailure { partition: usize, reason: String },

    #[error("scan exceeded its time budget")]
    ScanTimeout,

    #[error("no alignment found")]
    NoAlignmentFound,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors caused by the caller's input rather than by the search itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyQuery | Error::EmptyReference | Error::InvalidMetric(_) | Error::InvalidGranularity(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
