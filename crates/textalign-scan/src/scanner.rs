use std::hash::Hash;
use std::time::{Duration, Instant};

use textalign_core::error::{Error, Result};
use textalign_core::types::{split_words, Granularity, ReferenceText, SearchRegion};
use textalign_metric::Metric;

/// How often (in windows) a scan checks its deadline.
const DEADLINE_STRIDE: usize = 256;

/// A query split into the units it is scored by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryUnits {
    Chars(Vec<char>),
    Words(Vec<String>),
}

impl QueryUnits {
    pub fn new(text: &str, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Char => QueryUnits::Chars(text.chars().collect()),
            Granularity::Word => QueryUnits::Words(split_words(text)),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            QueryUnits::Chars(_) => Granularity::Char,
            QueryUnits::Words(_) => Granularity::Word,
        }
    }

    /// Window width in units.
    pub fn len(&self) -> usize {
        match self {
            QueryUnits::Chars(c) => c.len(),
            QueryUnits::Words(w) => w.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Best window found by one scan. `start == end` marks an empty hit: the
/// region could not hold a single window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowHit {
    pub score: f64,
    pub start: usize,
    pub end: usize,
}

impl WindowHit {
    pub fn empty(at: usize) -> Self { Self { score: 0.0, start: at, end: at } }

    pub fn is_empty(&self) -> bool { self.start == self.end }
}

/// Optional wall-clock bound on a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn none() -> Self { Self(None) }

    pub fn after(budget: Duration) -> Self { Self(Some(Instant::now() + budget)) }

    pub fn expired(&self) -> bool { self.0.is_some_and(|at| Instant::now() >= at) }
}

/// Slides a query-sized window over every start position in `region`.
///
/// The highest score wins; on equal scores the earliest start is kept. A
/// perfect score ends the scan early since nothing later can replace it.
pub fn scan_units<T: Eq + Hash>(
    query: &[T],
    reference: &[T],
    region: SearchRegion,
    metric: Metric,
    deadline: Deadline,
) -> Result<WindowHit> {
    if region.start > region.end || region.end > reference.len() {
        return Err(Error::RegionOutOfBounds { start: region.start, end: region.end, len: reference.len() });
    }
    let width = query.len();
    if width == 0 || region.len() < width {
        return Ok(WindowHit::empty(region.start));
    }

    let mut best: Option<WindowHit> = None;
    for start in region.start..=region.end - width {
        if (start - region.start) % DEADLINE_STRIDE == 0 && deadline.expired() {
            return Err(Error::ScanTimeout);
        }
        let score = metric.score(query, &reference[start..start + width]);
        if best.map_or(true, |b| score > b.score) {
            best = Some(WindowHit { score, start, end: start + width });
            if score >= 1.0 {
                break;
            }
        }
    }
    Ok(best.unwrap_or_else(|| WindowHit::empty(region.start)))
}

/// Scans `reference` at the query's granularity.
pub fn scan(
    query: &QueryUnits,
    reference: &ReferenceText,
    region: SearchRegion,
    metric: Metric,
    deadline: Deadline,
) -> Result<WindowHit> {
    match query {
        QueryUnits::Chars(q) => scan_units(q, reference.chars(), region, metric, deadline),
        QueryUnits::Words(q) => scan_units(q, reference.words(), region, metric, deadline),
    }
}
