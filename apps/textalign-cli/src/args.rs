use clap::Args;

use textalign_core::config::{AlignSettings, DataSettings};

/// Search options shared by both binaries; each one overrides the
/// configured value when given.
#[derive(Args, Debug, Clone, Default)]
pub struct AlignArgs {
    /// hamming (fast, less accurate), levenshtein (slow, accurate) or ratio
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Sliding window unit: char or word
    #[arg(short = 't', long = "search-type")]
    pub granularity: Option<String>,

    /// Number of parallel scan workers
    #[arg(short = 'n', long)]
    pub workers: Option<usize>,

    /// Continue each search from the end of the previous match
    #[arg(short, long)]
    pub sequenced: bool,

    /// Abort the parallel scan after this many milliseconds and fall back
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl AlignArgs {
    pub fn apply(&self, settings: &mut AlignSettings) {
        if let Some(metric) = &self.metric { settings.metric = metric.clone(); }
        if let Some(granularity) = &self.granularity { settings.granularity = granularity.clone(); }
        if let Some(workers) = self.workers { settings.workers = workers; }
        if self.sequenced { settings.sequenced = true; }
        if self.timeout_ms.is_some() { settings.scan_timeout_ms = self.timeout_ms; }
    }
}

/// Corpus locations for the batch run.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Directory holding transcript files (`id<TAB>text` lines)
    #[arg(long)]
    pub transcripts: Option<String>,

    /// Directory holding `<language>/<book>.txt`
    #[arg(short, long)]
    pub books: Option<String>,

    /// pt, pl, it, sp, fr, du, ge or en
    #[arg(short, long)]
    pub language: Option<String>,

    /// Where `output_<language>_<transcript>.csv` files are written
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl DataArgs {
    pub fn apply(&self, settings: &mut DataSettings) {
        if let Some(v) = &self.transcripts { settings.transcripts_dir = v.clone(); }
        if let Some(v) = &self.books { settings.books_dir = v.clone(); }
        if let Some(v) = &self.language { settings.language = v.clone(); }
        if let Some(v) = &self.output_dir { settings.output_dir = v.clone(); }
    }
}
