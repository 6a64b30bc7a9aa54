//! Batch driver: one transcript file in, one delimited output file out.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Component, Path, PathBuf};

use textalign_core::corpus::{load_transcript_file, normalize_whitespace, TRANSCRIPT_STEM};
use textalign_core::error::Error;
use textalign_core::sink::DelimitedWriter;
use textalign_core::traits::{ReferenceStore, ResultSink};
use textalign_core::types::{AlignmentRecord, ReferenceText, TranscriptRecord};
use textalign_engine::{AlignmentEngine, SequencingState};

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub transcript: PathBuf,
    pub output: PathBuf,
    /// Rows written, matched or not.
    pub rows: usize,
    /// Rows with a non-empty match.
    pub aligned: usize,
    /// Fragments dropped because their id or reference document was unusable.
    pub skipped: usize,
    pub mean_similarity: f64,
}

/// `output_<language>_<name>.csv`, where `name` is the transcript's path
/// relative to `transcripts_root` joined with `_`.
///
/// A split's `transcripts.txt` is named after its folder alone, so
/// `dev/transcripts.txt` becomes `output_<language>_dev.csv`.
pub fn output_file_name(language_dir: &str, transcripts_root: &Path, transcript: &Path) -> String {
    let stem = transcript.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let mut parts: Vec<String> = match transcript.strip_prefix(transcripts_root) {
        Ok(relative) => relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect(),
        // Outside the root a split is told apart by its enclosing folder.
        Err(_) if stem == TRANSCRIPT_STEM => transcript
            .parent()
            .and_then(Path::file_name)
            .map(|dir| vec![dir.to_string_lossy().into_owned()])
            .unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    if stem != TRANSCRIPT_STEM {
        parts.push(stem);
    } else if parts.is_empty() {
        parts.push(TRANSCRIPT_STEM.to_string());
    }
    format!("output_{}_{}.csv", language_dir, parts.join("_"))
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    rows: usize,
    aligned: usize,
    skipped: usize,
    total_similarity: f64,
}

/// Reference of the current run of same-document fragments. A document
/// that failed to load is remembered so its remaining fragments are skipped
/// without retrying.
enum Loaded {
    Ready(ReferenceText),
    Failed(String),
}

/// Aligns every record and writes one row per alignable fragment.
///
/// Records are expected in document order. The reference text is loaded
/// once per run of fragments sharing a document key.
fn process_records<S, W>(
    engine: &AlignmentEngine,
    store: &S,
    records: &[TranscriptRecord],
    sink: &mut W,
    progress: &ProgressBar,
) -> Result<Counts>
where
    S: ReferenceStore + ?Sized,
    W: ResultSink + ?Sized,
{
    let mut counts = Counts::default();
    let mut state = SequencingState::new();
    let mut current: Option<Loaded> = None;

    for record in records {
        progress.inc(1);
        let Some(key) = record.document_key() else {
            tracing::warn!(fragment = %record.fragment_id, "fragment id has no document component, skipping");
            counts.skipped += 1;
            continue;
        };

        let needs_load = match &current {
            Some(Loaded::Ready(reference)) => reference.key() != key,
            Some(Loaded::Failed(failed)) => failed != key,
            None => true,
        };
        if needs_load {
            current = Some(match store.load(key) {
                Ok(reference) => Loaded::Ready(reference),
                Err(e) => {
                    tracing::warn!(document = key, error = %e, "could not load reference, skipping its fragments");
                    Loaded::Failed(key.to_string())
                }
            });
        }
        let Some(Loaded::Ready(reference)) = &current else {
            counts.skipped += 1;
            continue;
        };

        let query = normalize_whitespace(&record.text);
        let (matched_text, score) = match engine.align(&query, reference, &mut state) {
            Ok(result) => {
                if !result.is_empty() {
                    counts.aligned += 1;
                }
                (result.matched_text, result.score)
            }
            Err(Error::EmptyReference) => {
                tracing::warn!(document = key, "reference text is empty, skipping fragment");
                counts.skipped += 1;
                continue;
            }
            Err(e @ (Error::NoAlignmentFound | Error::EmptyQuery)) => {
                tracing::warn!(fragment = %record.fragment_id, error = %e, "recording empty match");
                (String::new(), 0.0)
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(fragment = %record.fragment_id, score, "aligned");
        counts.total_similarity += score;
        counts.rows += 1;
        sink.write_record(&AlignmentRecord { fragment_id: record.fragment_id.clone(), query_text: query, matched_text, score })?;
    }
    sink.flush()?;
    Ok(counts)
}

fn progress_bar(len: usize, show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fragments ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Processes one transcript file into `output`.
pub fn run_transcript_file<S>(
    engine: &AlignmentEngine,
    store: &S,
    transcript: &Path,
    output: &Path,
    show_progress: bool,
) -> Result<BatchSummary>
where
    S: ReferenceStore + ?Sized,
{
    let records = load_transcript_file(transcript)?;
    tracing::info!(transcript = %transcript.display(), fragments = records.len(), "aligning transcript file");

    let pb = progress_bar(records.len(), show_progress)?;
    let mut writer = DelimitedWriter::create(output)?;
    let counts = process_records(engine, store, &records, &mut writer, &pb)?;
    pb.finish_with_message("done");

    let mean_similarity = if counts.rows == 0 { 0.0 } else { counts.total_similarity / counts.rows as f64 };
    tracing::info!(
        transcript = %transcript.display(),
        rows = counts.rows,
        aligned = counts.aligned,
        skipped = counts.skipped,
        mean_similarity,
        "transcript file complete"
    );
    Ok(BatchSummary {
        transcript: transcript.to_path_buf(),
        output: output.to_path_buf(),
        rows: counts.rows,
        aligned: counts.aligned,
        skipped: counts.skipped,
        mean_similarity,
    })
}
