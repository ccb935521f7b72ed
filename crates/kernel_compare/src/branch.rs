// Branch prediction experiment: the same conditional sum over sorted
// and unsorted copies of one dataset. Addition commutes, so the sums
// are identical; only the predictability of the branch differs.

use crate::dataset::XorShift64Star;
use crate::error::CompareError;

/// Sum of every element at or above `threshold`.
pub fn sum_above(values: &[i32], threshold: i32) -> i64 {
    let mut sum = 0i64;
    for &v in values {
        if v >= threshold {
            sum += v as i64;
        }
    }
    sum
}

/// Deterministic small-range input (`[0, 256)`) plus a sorted copy.
pub fn branch_inputs(size: usize, seed: u64) -> Result<(Vec<i32>, Vec<i32>), CompareError> {
    if size == 0 {
        return Err(CompareError::invalid("input size must be nonzero"));
    }

    let mut rng = XorShift64Star::new(seed);
    let unsorted: Vec<i32> = (0..size).map(|_| rng.next_i32_below(256)).collect();
    let mut sorted = unsorted.clone();
    sorted.sort_unstable();

    Ok((sorted, unsorted))
}
