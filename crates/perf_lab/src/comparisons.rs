// One function per benchmark family. Each builds its inputs fresh from
// the deterministic generator, registers the variants with the
// comparison runner, and logs the timing report. Nothing is shared
// between calls, so a failing parameter set cannot leak state into the
// next one.

use kernel_compare::CompareError;
use kernel_compare::branch::{branch_inputs, sum_above};
use kernel_compare::dataset::{Dataset, generate_f32, generate_i32, generate_matrix};
use kernel_compare::elementwise::{add, add_blocks, dot, dot_blocks, dot_ilp};
use kernel_compare::integrate::{integrate_parallel, integrate_sequential};
use kernel_compare::layout::{BoxedStore, PackedNarrowStore, PackedWideStore, SoaStore};
use kernel_compare::matrix::{
    MatrixBuffer, mat_mul_blocks, mat_mul_naive, mat_mul_reordered, transpose_naive,
    transpose_tiled,
};
use kernel_compare::normalize::{
    flatten, normalize_soa, normalize_soa_blocks, normalize_soa_parallel, normalize_store,
};
use kernel_compare::reduce::{SlotPolicy, min_max, min_max_blocks, min_max_ilp, min_max_parallel};
use kernel_compare::runner::{Comparison, Tolerance};

/// Normalize-in-place across every layout backend, plus the block and
/// data-parallel columnar forms. Scalar arithmetic is identical in all
/// of them, so agreement is checked tight.
pub fn run_normalize(size: usize, seed: u64, threads: usize) -> Result<(), CompareError> {
    let data = Dataset::generate(size, seed)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| CompareError::invalid(e.to_string()))?;

    let mut boxed = BoxedStore::from_dataset(&data);
    let mut narrow = PackedNarrowStore::from_dataset(&data);
    let mut wide = PackedWideStore::from_dataset(&data);
    let mut soa = SoaStore::from_dataset(&data);
    let mut soa_blocks = SoaStore::from_dataset(&data);
    let mut soa_parallel = SoaStore::from_dataset(&data);

    let report = Comparison::new(format!("normalize/n{size}"), Tolerance::Relative(1e-5))
        .variant("boxed", || {
            normalize_store(&mut boxed);
            Ok(flatten(&boxed))
        })
        .variant("packed_wide", || {
            normalize_store(&mut wide);
            Ok(flatten(&wide))
        })
        .variant("packed_narrow", || {
            normalize_store(&mut narrow);
            Ok(flatten(&narrow))
        })
        .variant("soa", || {
            normalize_soa(&mut soa);
            Ok(flatten(&soa))
        })
        .variant("soa_blocks", || {
            normalize_soa_blocks(&mut soa_blocks);
            Ok(flatten(&soa_blocks))
        })
        .variant("soa_parallel", || {
            normalize_soa_parallel(&mut soa_parallel, &pool);
            Ok(flatten(&soa_parallel))
        })
        .run()?;

    report.log();
    Ok(())
}

/// Element-wise add and dot product. The block add does the same
/// per-element arithmetic as the scalar loop, so the adds agree
/// exactly; the dot variants regroup the summation and only agree
/// within tolerance.
pub fn run_elementwise(size: usize, seed: u64) -> Result<(), CompareError> {
    let a = generate_f32(size, seed)?;
    let b = generate_f32(size, seed.wrapping_add(1))?;

    let mut out_scalar = vec![0f32; size];
    let mut out_blocks = vec![0f32; size];

    let report = Comparison::new(format!("add/n{size}"), Tolerance::Exact)
        .variant("scalar", || {
            add(&a, &b, &mut out_scalar)?;
            Ok(out_scalar.clone())
        })
        .variant("blocks", || {
            add_blocks(&a, &b, &mut out_blocks)?;
            Ok(out_blocks.clone())
        })
        .run()?;
    report.log();

    // Linear f32 accumulation over hundreds of thousands of terms
    // drifts on the order of 1e-4 relative against the split
    // accumulators, so the dot bound is looser than the matrix one.
    let report = Comparison::new(format!("dot/n{size}"), Tolerance::Relative(1e-3))
        .variant("scalar", || dot(&a, &b))
        .variant("ilp", || dot_ilp(&a, &b))
        .variant("blocks", || dot_blocks(&a, &b))
        .run()?;
    report.log();

    Ok(())
}

/// Min/max reduction: scalar, two-accumulator, block, and partitioned
/// parallel forms with both slot policies. Min and max commute, so
/// every variant must agree exactly.
pub fn run_min_max(size: usize, seed: u64, threads: usize) -> Result<(), CompareError> {
    let values = generate_i32(size, seed)?;

    let report = Comparison::new(
        format!("min_max/n{size}/t{threads}"),
        Tolerance::Exact,
    )
    .variant("naive", || min_max(&values))
    .variant("ilp", || min_max_ilp(&values))
    .variant("blocks", || min_max_blocks(&values))
    .variant("parallel_adjacent", || {
        min_max_parallel(&values, threads, SlotPolicy::Adjacent)
    })
    .variant("parallel_padded", || {
        min_max_parallel(&values, threads, SlotPolicy::Padded)
    })
    .run()?;

    report.log();
    Ok(())
}

/// Matrix multiply under three loop orders. Loop reordering changes the
/// floating-point summation order, hence the relative tolerance.
pub fn run_mat_mul(dim: usize, seed: u64) -> Result<(), CompareError> {
    let a = MatrixBuffer::from_vec(generate_matrix(dim, seed)?, dim)?;
    let b = MatrixBuffer::from_vec(generate_matrix(dim, seed.wrapping_add(1))?, dim)?;

    let mut c_naive = MatrixBuffer::zeroed(dim)?;
    let mut c_reordered = MatrixBuffer::zeroed(dim)?;
    let mut c_blocks = MatrixBuffer::zeroed(dim)?;

    let report = Comparison::new(format!("mat_mul/d{dim}"), Tolerance::Relative(1e-5))
        .variant("naive", || {
            mat_mul_naive(&a, &b, &mut c_naive)?;
            Ok(c_naive.as_slice().to_vec())
        })
        .variant("reordered", || {
            mat_mul_reordered(&a, &b, &mut c_reordered)?;
            Ok(c_reordered.as_slice().to_vec())
        })
        .variant("blocks", || {
            mat_mul_blocks(&a, &b, &mut c_blocks)?;
            Ok(c_blocks.as_slice().to_vec())
        })
        .run()?;

    report.log();
    Ok(())
}

/// Transpose: naive vs tiled. Pure data movement, bit-identical.
pub fn run_transpose(dim: usize, tile: usize, seed: u64) -> Result<(), CompareError> {
    let src = MatrixBuffer::from_vec(generate_matrix(dim, seed)?, dim)?;
    let mut dst_naive = MatrixBuffer::zeroed(dim)?;
    let mut dst_tiled = MatrixBuffer::zeroed(dim)?;

    let report = Comparison::new(format!("transpose/d{dim}/b{tile}"), Tolerance::Exact)
        .variant("naive", || {
            transpose_naive(&src, &mut dst_naive)?;
            Ok(dst_naive.as_slice().to_vec())
        })
        .variant("tiled", || {
            transpose_tiled(&src, &mut dst_tiled, tile)?;
            Ok(dst_tiled.as_slice().to_vec())
        })
        .run()?;

    report.log();
    Ok(())
}

/// Midpoint integration: sequential vs parallel with adjacent and
/// padded result slots. The two parallel runs must agree bit-for-bit;
/// sequential differs only by summation grouping.
pub fn run_integrate(steps: usize, threads: usize) -> Result<(), CompareError> {
    const FROM: f64 = 0.0;
    const TO: f64 = 1.0;

    let report = Comparison::new(
        format!("integrate/s{steps}/t{threads}"),
        Tolerance::Relative(1e-8),
    )
    .variant("sequential", || integrate_sequential(FROM, TO, steps))
    .variant("parallel_adjacent", || {
        integrate_parallel(FROM, TO, steps, threads, SlotPolicy::Adjacent)
    })
    .variant("parallel_padded", || {
        integrate_parallel(FROM, TO, steps, threads, SlotPolicy::Padded)
    })
    .run()?;

    report.log();
    Ok(())
}

/// Conditional sum over sorted vs unsorted copies of the same data.
/// Identical sums, very different branch-predictor behavior.
pub fn run_branch(size: usize, seed: u64) -> Result<(), CompareError> {
    let (sorted, unsorted) = branch_inputs(size, seed)?;

    let report = Comparison::new(format!("branch/n{size}"), Tolerance::Exact)
        .variant("sorted", || Ok(sum_above(&sorted, 128)))
        .variant("unsorted", || Ok(sum_above(&unsorted, 128)))
        .run()?;

    report.log();
    Ok(())
}
