use std::time::Duration;

use textalign_core::error::Error;
use textalign_core::types::{Granularity, ReferenceText, SearchRegion};
use textalign_metric::Metric;
use textalign_scan::{aggregate, partition, pool_threads, run_all, scan, scan_units, Deadline, QueryUnits, WindowHit, WorkerResult};

const FOX: &str = "the quick brown fox jumps over the lazy dog";

fn chars(s: &str) -> Vec<char> { s.chars().collect() }

#[test]
fn scanner_finds_exact_window() {
    let reference = ReferenceText::new("fox", FOX);
    let query = QueryUnits::new("brown fox", Granularity::Char);
    let region = SearchRegion::new(0, reference.unit_len(Granularity::Char));
    let hit = scan(&query, &reference, region, Metric::Hamming, Deadline::none()).unwrap();
    assert_eq!(hit, WindowHit { score: 1.0, start: 10, end: 19 });
    assert_eq!(reference.slice(Granularity::Char, hit.start, hit.end), "brown fox");
}

#[test]
fn scanner_word_granularity_uses_word_offsets() {
    let reference = ReferenceText::new("fox", FOX);
    let query = QueryUnits::new("over the lazy", Granularity::Word);
    let region = SearchRegion::new(0, reference.unit_len(Granularity::Word));
    let hit = scan(&query, &reference, region, Metric::Levenshtein, Deadline::none()).unwrap();
    assert_eq!((hit.start, hit.end, hit.score), (5, 8, 1.0));
}

#[test]
fn scanner_ties_keep_earliest_window() {
    let reference = chars("abcXabcX");
    let hit = scan_units(&chars("abc"), &reference, SearchRegion::new(0, 8), Metric::Hamming, Deadline::none()).unwrap();
    assert_eq!(hit.start, 0);
    let hit = scan_units(&chars("abd"), &reference, SearchRegion::new(1, 8), Metric::Hamming, Deadline::none()).unwrap();
    assert_eq!(hit.start, 4, "first full-length window at or after region start");
}

#[test]
fn scanner_short_region_yields_empty_hit() {
    let reference = chars("abcdef");
    let hit = scan_units(&chars("abcd"), &reference, SearchRegion::new(3, 6), Metric::Hamming, Deadline::none()).unwrap();
    assert_eq!(hit, WindowHit::empty(3));
    assert!(hit.is_empty());
}

#[test]
fn scanner_stays_inside_region() {
    let reference = chars("xxxxabcd");
    let hit = scan_units(&chars("abcd"), &reference, SearchRegion::new(0, 7), Metric::Hamming, Deadline::none()).unwrap();
    assert!(hit.end <= 7);
    assert!(hit.score < 1.0);
    let err = scan_units(&chars("ab"), &reference, SearchRegion::new(0, 9), Metric::Hamming, Deadline::none()).unwrap_err();
    assert!(matches!(err, Error::RegionOutOfBounds { .. }));
}

#[test]
fn scanner_honours_expired_deadline() {
    let reference = chars(&FOX.repeat(50));
    let deadline = Deadline::after(Duration::ZERO);
    std::thread::sleep(Duration::from_millis(1));
    let err = scan_units(&chars("lazy cat"), &reference, SearchRegion::new(0, reference.len()), Metric::Hamming, deadline).unwrap_err();
    assert!(matches!(err, Error::ScanTimeout));
}

#[test]
fn partitions_cover_region_without_gaps() {
    let region = SearchRegion::new(3, 103);
    for workers in 1..=12 {
        let parts = partition(region, workers, 4).unwrap();
        assert_eq!(parts.len(), workers);
        assert_eq!(parts[0].core.start, region.start);
        assert_eq!(parts.last().unwrap().core.end, region.end);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].core.end, pair[1].core.start);
            assert_eq!(pair[0].span.end, (pair[0].core.end + 4).min(region.end));
        }
        let sizes: Vec<_> = parts.iter().map(|p| p.core.len()).collect();
        assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1, "{sizes:?}");
        assert_eq!(parts.last().unwrap().span, parts.last().unwrap().core);
    }
}

#[test]
fn partitioner_reduces_workers_to_region_length() {
    let parts = partition(SearchRegion::new(0, 4), 5, 2).unwrap();
    assert_eq!(parts.len(), 4);
    assert!(parts.iter().all(|p| p.core.len() == 1));
    assert_eq!(parts.iter().map(|p| p.index).collect::<Vec<_>>(), [0, 1, 2, 3]);
}

#[test]
fn partitioner_rejects_degenerate_requests() {
    assert!(matches!(partition(SearchRegion::new(5, 5), 2, 0), Err(Error::InvalidPartitionRequest { region_len: 0, workers: 2 })));
    assert!(matches!(partition(SearchRegion::new(0, 5), 0, 0), Err(Error::InvalidPartitionRequest { region_len: 5, workers: 0 })));
}

#[test]
fn pool_returns_one_result_per_partition_in_order() {
    let parts = partition(SearchRegion::new(0, 40), 4, 0).unwrap();
    let results = run_all(&parts, |p| Ok(WindowHit { score: 0.5, start: p.core.start, end: p.core.start + 1 }));
    assert_eq!(results.len(), 4);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.partition, i);
        assert_eq!(r.outcome.as_ref().unwrap().start, parts[i].core.start);
    }
}

#[test]
fn pool_threads_are_capped_by_available_cores() {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    assert_eq!(pool_threads(0), 1);
    assert_eq!(pool_threads(1), 1);
    assert_eq!(pool_threads(100_000), cores);
}

#[test]
fn pool_runs_more_partitions_than_threads() {
    let parts = partition(SearchRegion::new(0, 5000), 5000, 0).unwrap();
    assert_eq!(parts.len(), 5000);
    let results = run_all(&parts, |p| Ok(WindowHit { score: 0.0, start: p.core.start, end: p.core.end }));
    assert_eq!(results.len(), 5000);
    assert!(results.iter().enumerate().all(|(i, r)| r.partition == i && r.is_ok()));
}

#[test]
fn pool_contains_worker_failures() {
    let parts = partition(SearchRegion::new(0, 40), 4, 0).unwrap();
    let results = run_all(&parts, |p| match p.index {
        1 => panic!("boom"),
        2 => Err(Error::RegionOutOfBounds { start: 0, end: 1, len: 0 }),
        _ => Ok(WindowHit { score: 0.25 * p.index as f64, start: p.core.start, end: p.core.start + 2 }),
    });
    assert!(results[0].is_ok());
    assert!(matches!(results[1].outcome, Err(Error::WorkerFailure { partition: 1, .. })));
    assert!(matches!(results[2].outcome, Err(Error::WorkerFailure { partition: 2, .. })));
    assert!(results[3].is_ok());
    let best = aggregate(&results).unwrap();
    assert_eq!(best.partition, 3);
}

fn ok(partition: usize, score: f64, start: usize, end: usize) -> WorkerResult {
    WorkerResult { partition, outcome: Ok(WindowHit { score, start, end }) }
}

#[test]
fn aggregator_breaks_ties_deterministically() {
    let results = vec![ok(2, 0.9, 30, 39), ok(0, 0.9, 10, 19), ok(1, 0.5, 20, 29)];
    assert_eq!(aggregate(&results).unwrap().hit.start, 10);

    // Same score and end offset: lowest partition index.
    let results = vec![ok(1, 0.7, 5, 9), ok(0, 0.7, 5, 9)];
    assert_eq!(aggregate(&results).unwrap().partition, 0);

    // Empty hits lose even to a zero-score window.
    let results = vec![ok(0, 0.0, 0, 0), ok(1, 0.0, 4, 8)];
    assert_eq!(aggregate(&results).unwrap().partition, 1);
}

#[test]
fn aggregator_is_order_independent() {
    let mut results = vec![ok(0, 0.3, 0, 5), ok(1, 0.8, 12, 17), ok(2, 0.8, 14, 19), ok(3, 0.1, 20, 25)];
    let forward = aggregate(&results).unwrap();
    results.reverse();
    assert_eq!(aggregate(&results).unwrap(), forward);
    assert_eq!(forward.hit.start, 12);
}

#[test]
fn aggregator_fails_when_every_worker_failed() {
    let results = vec![
        WorkerResult { partition: 0, outcome: Err(Error::ScanTimeout) },
        WorkerResult { partition: 1, outcome: Err(Error::WorkerFailure { partition: 1, reason: "x".into() }) },
    ];
    assert!(matches!(aggregate(&results), Err(Error::NoAlignmentFound)));
    assert!(results[0].timed_out());
}
