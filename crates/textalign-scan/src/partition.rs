use textalign_core::error::{Error, Result};
use textalign_core::types::{Partition, SearchRegion};

/// Splits `region` into contiguous cores whose sizes differ by at most one.
///
/// Every partition but the last has its span extended by `overlap` units
/// (clamped to `region.end`) so a window starting near the end of its core
/// is still read in full. Requests for more workers than positions are
/// reduced to one partition per position.
pub fn partition(region: SearchRegion, workers: usize, overlap: usize) -> Result<Vec<Partition>> {
    if region.is_empty() || workers == 0 {
        return Err(Error::InvalidPartitionRequest { region_len: region.len(), workers });
    }
    let workers = workers.min(region.len());
    let base = region.len() / workers;
    let extra = region.len() % workers;

    let mut partitions = Vec::with_capacity(workers);
    let mut start = region.start;
    for index in 0..workers {
        let size = base + usize::from(index < extra);
        let end = start + size;
        let span_end = if index + 1 == workers { end } else { (end + overlap).min(region.end) };
        partitions.push(Partition {
            index,
            core: SearchRegion::new(start, end),
            span: SearchRegion::new(start, span_end),
        });
        start = end;
    }
    Ok(partitions)
}
