use std::time::Duration;

use textalign_core::config::AlignSettings;
use textalign_core::error::{Error, Result};
use textalign_core::types::{AlignmentResult, Granularity, ReferenceText, SearchRegion};
use textalign_metric::Metric;
use textalign_scan::{aggregate, partition, run_all, scan, Deadline, QueryUnits, WindowHit, WorkerResult};

use crate::sequencing::SequencingState;

/// Validated search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub metric: Metric,
    pub granularity: Granularity,
    pub workers: usize,
    pub sequenced: bool,
    pub scan_timeout: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { metric: Metric::Hamming, granularity: Granularity::Word, workers: 4, sequenced: false, scan_timeout: None }
    }
}

impl EngineOptions {
    pub fn from_settings(settings: &AlignSettings) -> Result<Self> {
        if settings.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".to_string()));
        }
        Ok(Self {
            metric: settings.metric.parse()?,
            granularity: settings.granularity.parse()?,
            workers: settings.workers,
            sequenced: settings.sequenced,
            scan_timeout: settings.scan_timeout_ms.map(Duration::from_millis),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Partitioning,
    Scanning,
    Aggregating,
    Fallback,
    Done,
}

pub struct AlignmentEngine {
    options: EngineOptions,
}

impl AlignmentEngine {
    pub fn new(options: EngineOptions) -> Self { Self { options } }

    pub fn options(&self) -> &EngineOptions { &self.options }

    /// Locates the window of `reference` that best matches `query`.
    ///
    /// In sequenced mode the search starts where the previous match on the
    /// same document ended and `state` is advanced past each match; a
    /// non-sequenced call resets it. Input errors leave it untouched.
    ///
    /// A query longer than the whole reference yields an empty, zero-score
    /// result rather than an error.
    pub fn align(&self, query: &str, reference: &ReferenceText, state: &mut SequencingState) -> Result<AlignmentResult> {
        let granularity = self.options.granularity;
        let units = QueryUnits::new(query, granularity);
        if units.is_empty() {
            return Err(Error::EmptyQuery);
        }
        let total = reference.unit_len(granularity);
        if total == 0 {
            return Err(Error::EmptyReference);
        }

        let start = state.search_start(reference.key(), self.options.sequenced).min(total);
        let region = SearchRegion::new(start, total);
        let deadline = self.options.scan_timeout.map(Deadline::after).unwrap_or_default();

        let (hit, fallback) = match self.parallel_scan(&units, reference, region, deadline) {
            Ok(hit) if !hit.is_empty() => (hit, false),
            outcome => {
                let reason = match outcome {
                    Err(e) => e.to_string(),
                    Ok(_) => "region shorter than query".to_string(),
                };
                tracing::warn!(key = reference.key(), %reason, "parallel scan gave no match, scanning sequentially");
                (self.fallback_scan(&units, reference, region)?, true)
            }
        };

        if !self.options.sequenced {
            state.reset();
        } else if !hit.is_empty() {
            state.advance(reference.key(), hit.end);
        }
        tracing::debug!(phase = ?Phase::Done, key = reference.key(), score = hit.score, start = hit.start, end = hit.end);
        Ok(AlignmentResult {
            matched_text: reference.slice(granularity, hit.start, hit.end).to_string(),
            score: hit.score,
            match_start: hit.start,
            match_end: hit.end,
            fallback,
        })
    }

    fn parallel_scan(
        &self,
        units: &QueryUnits,
        reference: &ReferenceText,
        region: SearchRegion,
        deadline: Deadline,
    ) -> Result<WindowHit> {
        tracing::debug!(phase = ?Phase::Partitioning, start = region.start, end = region.end, workers = self.options.workers);
        let partitions = partition(region, self.options.workers, units.len().saturating_sub(1))?;

        tracing::debug!(phase = ?Phase::Scanning, partitions = partitions.len());
        let metric = self.options.metric;
        let results = run_all(&partitions, |p| scan(units, reference, p.span, metric, deadline));
        if results.iter().any(WorkerResult::timed_out) {
            // Partial results would depend on which workers finished first.
            return Err(Error::ScanTimeout);
        }

        tracing::debug!(phase = ?Phase::Aggregating, failed = results.iter().filter(|r| !r.is_ok()).count());
        Ok(aggregate(&results)?.hit)
    }

    /// Single-threaded Hamming scan without a deadline. A region too short
    /// for the query (a sequenced search that ran past the last window) is
    /// widened to the whole document; if even that cannot hold the query the
    /// empty hit is returned.
    fn fallback_scan(&self, units: &QueryUnits, reference: &ReferenceText, region: SearchRegion) -> Result<WindowHit> {
        let region = if region.len() < units.len() {
            SearchRegion::new(0, reference.unit_len(units.granularity()))
        } else {
            region
        };
        tracing::debug!(phase = ?Phase::Fallback, start = region.start, end = region.end);
        scan(units, reference, region, Metric::Hamming, Deadline::none()).map_err(|e| {
            tracing::warn!(error = %e, "sequential fallback failed");
            Error::NoAlignmentFound
        })
    }
}
