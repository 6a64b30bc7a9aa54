//! Domain types shared by the scanner, the engine and the batch driver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{Error, Result};

pub type DocumentKey = String;

/// Unit of the sliding window and of scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Char,
    #[default]
    Word,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "char" | "chars" | "character" => Ok(Granularity::Char),
            "word" | "words" => Ok(Granularity::Word),
            other => Err(Error::InvalidGranularity(other.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Char => f.write_str("char"),
            Granularity::Word => f.write_str("word"),
        }
    }
}

/// Splits already-normalized text into word units.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// One source document, tokenized once and shared read-only by every query
/// against it.
///
/// Character offsets index Unicode scalar values, word offsets index
/// whitespace-separated words. Both map back to byte ranges of the original
/// text so a matched window can be returned verbatim.
#[derive(Debug, Clone)]
pub struct ReferenceText {
    key: DocumentKey,
    text: String,
    chars: Vec<char>,
    char_offsets: Vec<usize>,
    words: Vec<String>,
    word_spans: Vec<Range<usize>>,
}

impl ReferenceText {
    pub fn new(key: impl Into<DocumentKey>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut chars = Vec::with_capacity(text.len());
        let mut char_offsets = Vec::with_capacity(text.len() + 1);
        for (offset, c) in text.char_indices() {
            chars.push(c);
            char_offsets.push(offset);
        }
        char_offsets.push(text.len());

        let mut words = Vec::new();
        let mut word_spans = Vec::new();
        let mut word_start = None;
        for (offset, c) in text.char_indices() {
            match (c.is_whitespace(), word_start) {
                (false, None) => word_start = Some(offset),
                (true, Some(start)) => {
                    words.push(text[start..offset].to_string());
                    word_spans.push(start..offset);
                    word_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = word_start {
            words.push(text[start..].to_string());
            word_spans.push(start..text.len());
        }

        Self { key: key.into(), text, chars, char_offsets, words, word_spans }
    }

    pub fn key(&self) -> &str { &self.key }

    pub fn as_str(&self) -> &str { &self.text }

    pub fn is_empty(&self) -> bool { self.chars.is_empty() }

    pub fn chars(&self) -> &[char] { &self.chars }

    pub fn words(&self) -> &[String] { &self.words }

    /// Number of units at the given granularity.
    pub fn unit_len(&self, granularity: Granularity) -> usize {
        match granularity {
            Granularity::Char => self.chars.len(),
            Granularity::Word => self.words.len(),
        }
    }

    /// Returns the original text covered by units `[start, end)`.
    ///
    /// Out-of-range or empty windows yield an empty string.
    pub fn slice(&self, granularity: Granularity, start: usize, end: usize) -> &str {
        if start >= end {
            return "";
        }
        match granularity {
            Granularity::Char => {
                if end > self.chars.len() {
                    return "";
                }
                &self.text[self.char_offsets[start]..self.char_offsets[end]]
            }
            Granularity::Word => {
                if end > self.words.len() {
                    return "";
                }
                &self.text[self.word_spans[start].start..self.word_spans[end - 1].end]
            }
        }
    }
}

/// Half-open unit range `[start, end)` bounding where a call may search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchRegion {
    pub start: usize,
    pub end: usize,
}

impl SearchRegion {
    /// An inverted range collapses to an empty region at `start`.
    pub fn new(start: usize, end: usize) -> Self { Self { start, end: end.max(start) } }

    pub fn len(&self) -> usize { self.end.saturating_sub(self.start) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// One worker's share of a region.
///
/// `core` is the part owned exclusively by this worker; `span` extends it by
/// the overlap so windows starting inside `core` can be read in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub core: SearchRegion,
    pub span: SearchRegion,
}

/// Outcome of one alignment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub matched_text: String,
    pub score: f64,
    pub match_start: usize,
    /// Exclusive end of the match; seeds the next sequenced search.
    pub match_end: usize,
    pub fallback: bool,
}

impl AlignmentResult {
    /// No window of the reference could hold the query.
    pub fn is_empty(&self) -> bool { self.match_start == self.match_end }
}

/// One transcript line: an utterance id and its spoken text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub fragment_id: String,
    pub text: String,
}

impl TranscriptRecord {
    /// Fragment ids look like `speaker_book_utterance`; the book component
    /// names the reference document.
    pub fn document_key(&self) -> Option<&str> {
        self.fragment_id.split('_').nth(1).filter(|k| !k.is_empty())
    }
}

/// One persisted output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub fragment_id: String,
    pub query_text: String,
    pub matched_text: String,
    pub score: f64,
}
