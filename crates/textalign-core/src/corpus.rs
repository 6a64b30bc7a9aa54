//! Corpus layout: transcript files and the per-language book directory.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::traits::ReferenceStore;
use crate::types::{ReferenceText, TranscriptRecord};

const LANGUAGES: &[(&str, &str)] = &[
    ("pt", "portuguese"),
    ("pl", "polish"),
    ("it", "italian"),
    ("sp", "spanish"),
    ("fr", "french"),
    ("du", "dutch"),
    ("ge", "german"),
    ("en", "english"),
];

/// Maps a language abbreviation to the folder holding its books.
pub fn language_folder(abbrev: &str) -> crate::error::Result<&'static str> {
    let abbrev = abbrev.trim().to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(a, _)| *a == abbrev)
        .map(|(_, name)| *name)
        .ok_or_else(|| Error::InvalidConfig(format!("unknown language '{}'", abbrev)))
}

/// Removes line breaks and collapses whitespace runs to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses `fragmentId<TAB>text` lines.
///
/// Duplicate ids keep the last line seen; the result is ordered by id, which
/// keeps the utterances of one book together and in reading order.
pub fn parse_transcripts(content: &str) -> Vec<TranscriptRecord> {
    let mut by_id = BTreeMap::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        let Some((id, text)) = line.split_once('\t') else {
            tracing::warn!(line = line_no + 1, "skipping transcript line without a tab separator");
            continue;
        };
        let id = id.trim();
        if id.is_empty() {
            tracing::warn!(line = line_no + 1, "skipping transcript line with empty id");
            continue;
        }
        by_id.insert(id.to_string(), text.trim().to_string());
    }
    by_id.into_iter().map(|(fragment_id, text)| TranscriptRecord { fragment_id, text }).collect()
}

pub fn load_transcript_file(path: &Path) -> Result<Vec<TranscriptRecord>> {
    let content = read_file_content(path).with_context(|| format!("reading transcripts {}", path.display()))?;
    Ok(parse_transcripts(&content))
}

/// File stem of a split's transcript file (`<split>/transcripts.txt`).
pub const TRANSCRIPT_STEM: &str = "transcripts";

/// Companion files that share the tab-separated layout but hold no text.
const NON_TRANSCRIPT_STEMS: &[&str] = &["segments"];

/// Transcript files under `root`, sorted.
///
/// When the corpus is laid out as split folders, only their
/// `transcripts.txt` / `transcripts.tsv` files are returned. A flat
/// directory falls back to every `*.txt` / `*.tsv` file except
/// segment listings.
pub fn list_transcript_files(root: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path();
        if matches!(path.extension().and_then(|s| s.to_str()), Some("txt" | "tsv")) { candidates.push(path.to_path_buf()); }
    }
    fn stem(p: &Path) -> &str { p.file_stem().and_then(|s| s.to_str()).unwrap_or_default() }

    let mut files: Vec<PathBuf> = candidates.iter().filter(|p| stem(p) == TRANSCRIPT_STEM).cloned().collect();
    if files.is_empty() {
        files = candidates.into_iter().filter(|p| !NON_TRANSCRIPT_STEMS.contains(&stem(p))).collect();
    }
    files.sort();
    files
}

fn read_file_content(file_path: &Path) -> std::io::Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
    }
}

/// Books stored as `<root>/<language>/<key>.txt`.
#[derive(Debug, Clone)]
pub struct BookDirectory {
    root: PathBuf,
    language_dir: &'static str,
}

impl BookDirectory {
    pub fn new(root: impl Into<PathBuf>, language: &str) -> crate::error::Result<Self> {
        Ok(Self { root: root.into(), language_dir: language_folder(language)? })
    }

    pub fn path_for(&self, key: &str) -> PathBuf { self.root.join(self.language_dir).join(format!("{}.txt", key)) }
}

impl ReferenceStore for BookDirectory {
    fn load(&self, key: &str) -> Result<ReferenceText> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(Error::NotFound(path.display().to_string()).into());
        }
        let raw = read_file_content(&path).with_context(|| format!("reading book {}", path.display()))?;
        let text = normalize_whitespace(&raw);
        tracing::debug!(key, chars = text.chars().count(), "loaded reference text");
        Ok(ReferenceText::new(key, text))
    }
}
