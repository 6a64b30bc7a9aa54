use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::traits::ResultSink;
use crate::types::AlignmentRecord;

pub const SEPARATOR: char = '|';

/// Writes `fragmentId|queryText|matchedText|score` lines.
///
/// The separator and line breaks inside fields are replaced by spaces so
/// every record stays on one parseable line.
pub struct DelimitedWriter<W: Write> {
    out: W,
}

impl DelimitedWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path).with_context(|| format!("creating output {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(out: W) -> Self { Self { out } }

    pub fn into_inner(self) -> W { self.out }
}

fn field(s: &str) -> String {
    s.trim().chars().map(|c| if c == SEPARATOR || c == '\n' || c == '\r' { ' ' } else { c }).collect()
}

/// Formats a score the way it is persisted: shortest round-trip form with a
/// fractional part (`1.0`, `0.8888888888888888`).
pub fn format_score(score: f64) -> String { format!("{:?}", score) }

impl<W: Write> ResultSink for DelimitedWriter<W> {
    fn write_record(&mut self, record: &AlignmentRecord) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "{id}{sep}{query}{sep}{matched}{sep}{score}",
            id = field(&record.fragment_id),
            query = field(&record.query_text),
            matched = field(&record.matched_text),
            score = format_score(record.score),
            sep = SEPARATOR,
        )?;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
