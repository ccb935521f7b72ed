// Element-wise add and dot-product kernels over flat `f32` slices.

use crate::LANES;
use crate::error::CompareError;

fn check_lengths(a: &[f32], b: &[f32]) -> Result<(), CompareError> {
    if a.len() != b.len() {
        return Err(CompareError::invalid(format!(
            "input lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// `out[i] = a[i] + b[i]`, one element per iteration.
pub fn add(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<(), CompareError> {
    check_lengths(a, b)?;
    check_lengths(a, out)?;

    for i in 0..a.len() {
        out[i] = a[i] + b[i];
    }
    Ok(())
}

/// Explicit-vector add: `LANES` elements per block, scalar remainder.
pub fn add_blocks(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<(), CompareError> {
    check_lengths(a, b)?;
    check_lengths(a, out)?;

    let blocks = a.len() / LANES;
    for blk in 0..blocks {
        let at = blk * LANES;
        let mut v = [0f32; LANES];
        for l in 0..LANES {
            v[l] = a[at + l] + b[at + l];
        }
        out[at..at + LANES].copy_from_slice(&v);
    }

    for i in blocks * LANES..a.len() {
        out[i] = a[i] + b[i];
    }
    Ok(())
}

/// Dot product with a single accumulator; every multiply-add depends on
/// the previous one.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32, CompareError> {
    check_lengths(a, b)?;

    let mut acc = 0f32;
    for i in 0..a.len() {
        acc += a[i] * b[i];
    }
    Ok(acc)
}

/// Dot product with two independent accumulators, breaking the serial
/// dependence chain so the CPU can overlap the multiply-adds.
pub fn dot_ilp(a: &[f32], b: &[f32]) -> Result<f32, CompareError> {
    check_lengths(a, b)?;

    let pairs = a.len() / 2;
    let mut acc0 = 0f32;
    let mut acc1 = 0f32;

    for i in 0..pairs {
        acc0 += a[2 * i] * b[2 * i];
        acc1 += a[2 * i + 1] * b[2 * i + 1];
    }
    if a.len() % 2 == 1 {
        acc0 += a[a.len() - 1] * b[a.len() - 1];
    }
    Ok(acc0 + acc1)
}

/// Dot product accumulated across `LANES` independent lanes, folded at
/// the end; scalar tail for the remainder.
pub fn dot_blocks(a: &[f32], b: &[f32]) -> Result<f32, CompareError> {
    check_lengths(a, b)?;

    let blocks = a.len() / LANES;
    let mut acc = [0f32; LANES];

    for blk in 0..blocks {
        let at = blk * LANES;
        for l in 0..LANES {
            acc[l] += a[at + l] * b[at + l];
        }
    }

    let mut total: f32 = acc.iter().sum();
    for i in blocks * LANES..a.len() {
        total += a[i] * b[i];
    }
    Ok(total)
}
