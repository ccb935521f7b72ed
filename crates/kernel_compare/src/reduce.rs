// Min/max reduction variants.
//
// Min and max are associative and commutative, so every variant here
// must return the identical pair for the same input, whatever the
// traversal or partitioning order.

use std::thread;

use crate::error::{CompareError, panic_message};
use crate::{CACHE_LINE_BYTES, LANES};

/// How parallel workers' result slots are spaced in the shared output
/// array. `Adjacent` packs them into consecutive cells, which puts
/// several slots on one cache line and provokes false sharing;
/// `Padded` spaces them one cache line apart. Both are correct, they
/// differ only in timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPolicy {
    Adjacent,
    Padded,
}

impl SlotPolicy {
    pub(crate) fn stride<T>(self) -> usize {
        match self {
            Self::Adjacent => 1,
            Self::Padded => CACHE_LINE_BYTES / size_of::<T>(),
        }
    }
}

fn check_nonempty(values: &[i32]) -> Result<(), CompareError> {
    if values.is_empty() {
        return Err(CompareError::invalid("reduction input must be nonempty"));
    }
    Ok(())
}

/// Single-accumulator scan.
pub fn min_max(values: &[i32]) -> Result<(i32, i32), CompareError> {
    check_nonempty(values)?;

    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

/// Two independent accumulator pairs so even- and odd-index comparisons
/// can retire in parallel; odd-length inputs fold the last element into
/// the first pair.
pub fn min_max_ilp(values: &[i32]) -> Result<(i32, i32), CompareError> {
    check_nonempty(values)?;

    let (mut min0, mut min1) = (i32::MAX, i32::MAX);
    let (mut max0, mut max1) = (i32::MIN, i32::MIN);

    let pairs = values.len() / 2;
    for i in 0..pairs {
        let (v0, v1) = (values[2 * i], values[2 * i + 1]);
        min0 = min0.min(v0);
        min1 = min1.min(v1);
        max0 = max0.max(v0);
        max1 = max1.max(v1);
    }
    if values.len() % 2 == 1 {
        let last = values[values.len() - 1];
        min0 = min0.min(last);
        max0 = max0.max(last);
    }

    Ok((min0.min(min1), max0.max(max1)))
}

/// `LANES` lane-wise accumulators over whole blocks, folded across lanes
/// at the end, with a scalar tail for the remainder.
pub fn min_max_blocks(values: &[i32]) -> Result<(i32, i32), CompareError> {
    check_nonempty(values)?;

    let mut vmin = [i32::MAX; LANES];
    let mut vmax = [i32::MIN; LANES];

    let blocks = values.len() / LANES;
    for blk in 0..blocks {
        let at = blk * LANES;
        for l in 0..LANES {
            vmin[l] = vmin[l].min(values[at + l]);
            vmax[l] = vmax[l].max(values[at + l]);
        }
    }

    let mut min = vmin.iter().copied().fold(i32::MAX, i32::min);
    let mut max = vmax.iter().copied().fold(i32::MIN, i32::max);
    for &v in &values[blocks * LANES..] {
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

/// Partitioned reduction over `threads` scoped workers. The index range
/// is split into contiguous chunks (the last chunk absorbs any
/// remainder); each worker owns one disjoint slot in the shared partial
/// arrays and updates it as it scans, so slot spacing is exactly the
/// false-sharing experiment `policy` selects. Partials are combined
/// after the join barrier.
pub fn min_max_parallel(
    values: &[i32],
    threads: usize,
    policy: SlotPolicy,
) -> Result<(i32, i32), CompareError> {
    check_nonempty(values)?;
    if threads == 0 {
        return Err(CompareError::invalid("thread count must be nonzero"));
    }

    let stride = policy.stride::<i32>();
    let mut mins = vec![i32::MAX; threads * stride];
    let mut maxs = vec![i32::MIN; threads * stride];
    let chunk_len = values.len() / threads;

    thread::scope(|s| {
        let handles: Vec<_> = mins
            .chunks_mut(stride)
            .zip(maxs.chunks_mut(stride))
            .enumerate()
            .map(|(w, (min_slot, max_slot))| {
                let from = w * chunk_len;
                let to = if w == threads - 1 {
                    values.len()
                } else {
                    (w + 1) * chunk_len
                };

                let handle = s.spawn(move || {
                    for &v in &values[from..to] {
                        min_slot[0] = min_slot[0].min(v);
                        max_slot[0] = max_slot[0].max(v);
                    }
                });
                (w, handle)
            })
            .collect();

        // Join everything before reporting, so one failure does not
        // leave unjoined workers behind.
        let mut failure = None;
        for (w, handle) in handles {
            if let Err(payload) = handle.join()
                && failure.is_none()
            {
                failure = Some(CompareError::WorkerFailure {
                    worker: w,
                    message: panic_message(payload),
                });
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })?;

    let min = mins.iter().step_by(stride).copied().fold(i32::MAX, i32::min);
    let max = maxs.iter().step_by(stride).copied().fold(i32::MIN, i32::max);
    Ok((min, max))
}
