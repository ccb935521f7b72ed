// unit tests

use crate::branch::{branch_inputs, sum_above};
use crate::dataset::{Dataset, generate_f32, generate_i32, generate_matrix};
use crate::elementwise::{add, add_blocks, dot, dot_blocks, dot_ilp};
use crate::error::CompareError;
use crate::integrate::{integrate_parallel, integrate_sequential};
use crate::layout::{
    BoxedStore, PackedNarrowStore, PackedWideStore, SoaStore, VectorStore,
};
use crate::matrix::{
    MatrixBuffer, mat_mul_blocks, mat_mul_naive, mat_mul_reordered, transpose_naive,
    transpose_tiled,
};
use crate::normalize::{
    flatten, normalize_soa, normalize_soa_blocks, normalize_soa_parallel, normalize_store,
};
use crate::reduce::{SlotPolicy, min_max, min_max_blocks, min_max_ilp, min_max_parallel};
use crate::runner::{Comparison, Tolerance};
use crate::CACHE_LINE_BYTES;

// Sizes deliberately not divisible by LANES or 2, so every block and
// ILP kernel exercises its tail path.
const ODD_SIZE: usize = 1013;
const SEED: u64 = 42;

fn assert_invalid(result: Result<impl Sized, CompareError>) {
    assert!(matches!(result, Err(CompareError::InvalidArgument(_))));
}

// dataset

#[test]
fn generate_is_deterministic() {
    let a = Dataset::generate(ODD_SIZE, SEED).unwrap();
    let b = Dataset::generate(ODD_SIZE, SEED).unwrap();
    assert_eq!(a.records(), b.records());

    let c = Dataset::generate(ODD_SIZE, SEED + 1).unwrap();
    assert_ne!(a.records(), c.records());
}

#[test]
fn generate_components_in_unit_interval() {
    let data = Dataset::generate(ODD_SIZE, SEED).unwrap();
    for &[x, y, z] in data.records() {
        for v in [x, y, z] {
            assert!((0.0..1.0).contains(&v));
        }
    }
}

#[test]
fn generate_rejects_zero_size() {
    assert_invalid(Dataset::generate(0, SEED));
    assert_invalid(generate_f32(0, SEED));
    assert_invalid(generate_i32(0, SEED));
    assert_invalid(generate_matrix(0, SEED));
}

// layout adapters

#[test]
fn packed_record_sizes_straddle_cache_line() {
    assert!(PackedNarrowStore::stride() <= CACHE_LINE_BYTES);
    assert!(PackedWideStore::stride() > CACHE_LINE_BYTES);
}

#[test]
fn layouts_are_transparent() {
    let data = Dataset::generate(257, SEED).unwrap();

    let boxed = BoxedStore::from_dataset(&data);
    let narrow = PackedNarrowStore::from_dataset(&data);
    let wide = PackedWideStore::from_dataset(&data);
    let soa = SoaStore::from_dataset(&data);

    for i in 0..data.len() {
        let expected = data.get(i);
        assert_eq!(boxed.get(i), expected);
        assert_eq!(narrow.get(i), expected);
        assert_eq!(wide.get(i), expected);
        assert_eq!(soa.get(i), expected);
    }
}

#[test]
fn layout_set_round_trips() {
    let data = Dataset::generate(8, SEED).unwrap();
    let mut soa = SoaStore::from_dataset(&data);
    let mut boxed = BoxedStore::from_dataset(&data);

    soa.set(3, [0.5, 0.25, 0.125]);
    boxed.set(3, [0.5, 0.25, 0.125]);
    assert_eq!(soa.get(3), [0.5, 0.25, 0.125]);
    assert_eq!(boxed.get(3), [0.5, 0.25, 0.125]);
}

// normalize

fn assert_unit_norms(flat: &[f32]) {
    for triple in flat.chunks_exact(3) {
        let norm =
            (triple[0] * triple[0] + triple[1] * triple[1] + triple[2] * triple[2]).sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }
}

#[test]
fn normalize_agrees_across_layouts_and_variants() {
    let data = Dataset::generate(ODD_SIZE, SEED).unwrap();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap();

    let mut boxed = BoxedStore::from_dataset(&data);
    let mut narrow = PackedNarrowStore::from_dataset(&data);
    let mut wide = PackedWideStore::from_dataset(&data);
    let mut soa_scalar = SoaStore::from_dataset(&data);
    let mut soa_blocks = SoaStore::from_dataset(&data);
    let mut soa_parallel = SoaStore::from_dataset(&data);

    normalize_store(&mut boxed);
    normalize_store(&mut narrow);
    normalize_store(&mut wide);
    normalize_soa(&mut soa_scalar);
    normalize_soa_blocks(&mut soa_blocks);
    normalize_soa_parallel(&mut soa_parallel, &pool);

    let reference = flatten(&soa_scalar);
    assert_unit_norms(&reference);

    // Same scalar arithmetic per element in every variant, so results
    // are bit-identical, not merely close.
    assert_eq!(reference, flatten(&boxed));
    assert_eq!(reference, flatten(&narrow));
    assert_eq!(reference, flatten(&wide));
    assert_eq!(reference, flatten(&soa_blocks));
    assert_eq!(reference, flatten(&soa_parallel));
}

// element-wise kernels

#[test]
fn add_blocks_matches_scalar_with_tail() {
    let a: Vec<f32> = (0..ODD_SIZE).map(|i| i as f32 * 0.25).collect();
    let b: Vec<f32> = (0..ODD_SIZE).map(|i| (ODD_SIZE - i) as f32).collect();

    let mut scalar = vec![0f32; ODD_SIZE];
    let mut blocked = vec![0f32; ODD_SIZE];
    add(&a, &b, &mut scalar).unwrap();
    add_blocks(&a, &b, &mut blocked).unwrap();

    assert_eq!(scalar, blocked);
}

#[test]
fn add_rejects_mismatched_lengths() {
    let a = vec![1f32; 4];
    let b = vec![1f32; 5];
    let mut out = vec![0f32; 4];
    assert_invalid(add(&a, &b, &mut out));
    assert_invalid(add_blocks(&a, &b, &mut out));
}

#[test]
fn dot_variants_agree_within_tolerance() {
    let a: Vec<f32> = (0..ODD_SIZE).map(|i| (i as f32).sin()).collect();
    let b: Vec<f32> = (0..ODD_SIZE).map(|i| (i as f32).cos()).collect();

    let reference = dot(&a, &b).unwrap() as f64;
    for other in [dot_ilp(&a, &b).unwrap(), dot_blocks(&a, &b).unwrap()] {
        let scale = reference.abs().max(other.abs() as f64).max(1.0);
        assert!((reference - other as f64).abs() / scale < 1e-4);
    }
}

// reductions

#[test]
fn min_max_concrete_case_across_all_variants() {
    let values = [5, -3, 100, 0, -100, 42];
    let expected = (-100, 100);

    assert_eq!(min_max(&values).unwrap(), expected);
    assert_eq!(min_max_ilp(&values).unwrap(), expected);
    assert_eq!(min_max_blocks(&values).unwrap(), expected);
    for threads in [1, 2, 3, 6] {
        for policy in [SlotPolicy::Adjacent, SlotPolicy::Padded] {
            assert_eq!(min_max_parallel(&values, threads, policy).unwrap(), expected);
        }
    }
}

#[test]
fn min_max_variants_agree_on_random_input() {
    let values = generate_i32(ODD_SIZE, SEED).unwrap();
    let expected = min_max(&values).unwrap();

    assert_eq!(min_max_ilp(&values).unwrap(), expected);
    assert_eq!(min_max_blocks(&values).unwrap(), expected);

    // Thread counts that do and do not divide the length.
    for threads in [1, 2, 7, 16] {
        assert_eq!(
            min_max_parallel(&values, threads, SlotPolicy::Adjacent).unwrap(),
            expected
        );
        assert_eq!(
            min_max_parallel(&values, threads, SlotPolicy::Padded).unwrap(),
            expected
        );
    }
}

#[test]
fn min_max_ilp_handles_odd_length() {
    // Extremes in the unpaired tail position.
    assert_eq!(min_max_ilp(&[3, 2, -7]).unwrap(), (-7, 3));
    assert_eq!(min_max_ilp(&[3, 2, 11]).unwrap(), (2, 11));
    assert_eq!(min_max_ilp(&[4]).unwrap(), (4, 4));
}

#[test]
fn min_max_rejects_bad_arguments() {
    assert_invalid(min_max(&[]));
    assert_invalid(min_max_parallel(&[1, 2], 0, SlotPolicy::Padded));
}

#[test]
fn min_max_more_threads_than_elements() {
    let values = [9, -2, 5];
    assert_eq!(
        min_max_parallel(&values, 8, SlotPolicy::Padded).unwrap(),
        (-2, 9)
    );
}

// matrix kernels

#[test]
fn mat_mul_identity_returns_input() {
    let dim = 4;
    let m = MatrixBuffer::from_vec(generate_matrix(dim, SEED).unwrap(), dim).unwrap();
    let id = MatrixBuffer::identity(dim).unwrap();

    for mul in [mat_mul_naive, mat_mul_reordered, mat_mul_blocks] {
        let mut out = MatrixBuffer::zeroed(dim).unwrap();
        mul(&id, &m, &mut out).unwrap();
        for (got, want) in out.as_slice().iter().zip(m.as_slice()) {
            assert!((got - want).abs() <= 1e-5 * want.abs().max(1.0));
        }
    }
}

#[test]
fn mat_mul_variants_agree_on_random_input() {
    // Not a multiple of LANES, so the blocked inner loop runs its tail.
    let dim = 21;
    let a = MatrixBuffer::from_vec(generate_matrix(dim, SEED).unwrap(), dim).unwrap();
    let b = MatrixBuffer::from_vec(generate_matrix(dim, SEED + 1).unwrap(), dim).unwrap();

    let mut naive = MatrixBuffer::zeroed(dim).unwrap();
    mat_mul_naive(&a, &b, &mut naive).unwrap();

    for mul in [mat_mul_reordered, mat_mul_blocks] {
        let mut out = MatrixBuffer::zeroed(dim).unwrap();
        mul(&a, &b, &mut out).unwrap();
        for (got, want) in out.as_slice().iter().zip(naive.as_slice()) {
            assert!((got - want).abs() <= 1e-5 * want.abs().max(1.0));
        }
    }
}

#[test]
fn mat_mul_is_idempotent_across_repeated_calls() {
    let dim = 8;
    let a = MatrixBuffer::from_vec(generate_matrix(dim, SEED).unwrap(), dim).unwrap();
    let b = MatrixBuffer::from_vec(generate_matrix(dim, SEED + 1).unwrap(), dim).unwrap();

    let mut out = MatrixBuffer::zeroed(dim).unwrap();
    mat_mul_naive(&a, &b, &mut out).unwrap();
    let first: Vec<f32> = out.as_slice().to_vec();

    mat_mul_naive(&a, &b, &mut out).unwrap();
    assert_eq!(first, out.as_slice());
}

#[test]
fn transpose_4x4_bit_identical() {
    let dim = 4;
    let src =
        MatrixBuffer::from_vec((0..16).map(|v| v as f32).collect(), dim).unwrap();

    let mut naive = MatrixBuffer::zeroed(dim).unwrap();
    let mut tiled = MatrixBuffer::zeroed(dim).unwrap();
    transpose_naive(&src, &mut naive).unwrap();
    transpose_tiled(&src, &mut tiled, 2).unwrap();

    let expected: Vec<f32> = vec![
        0.0, 4.0, 8.0, 12.0, //
        1.0, 5.0, 9.0, 13.0, //
        2.0, 6.0, 10.0, 14.0, //
        3.0, 7.0, 11.0, 15.0, //
    ];
    assert_eq!(naive.as_slice(), expected.as_slice());
    assert_eq!(tiled.as_slice(), expected.as_slice());
}

#[test]
fn transpose_tiled_rejects_non_dividing_tile() {
    let src = MatrixBuffer::zeroed(8).unwrap();
    let mut dst = MatrixBuffer::zeroed(8).unwrap();
    assert_invalid(transpose_tiled(&src, &mut dst, 3));
    assert_invalid(transpose_tiled(&src, &mut dst, 0));
}

#[test]
fn matrix_buffer_rejects_wrong_backing_length() {
    assert_invalid(MatrixBuffer::from_vec(vec![0f32; 5], 2));
    assert_invalid(MatrixBuffer::zeroed(0));
}

// integration / false sharing

#[test]
fn integrate_padding_never_changes_the_result() {
    for threads in [1, 2, 4, 5] {
        let adjacent =
            integrate_parallel(0.0, 1.0, 100_000, threads, SlotPolicy::Adjacent).unwrap();
        let padded =
            integrate_parallel(0.0, 1.0, 100_000, threads, SlotPolicy::Padded).unwrap();
        // Same partials combined in the same order.
        assert_eq!(adjacent.to_bits(), padded.to_bits());
    }
}

#[test]
fn integrate_parallel_matches_sequential() {
    let sequential = integrate_sequential(0.0, 1.0, 100_000).unwrap();
    // Integral of 4/(1+x^2) over [0,1] is pi.
    assert!((sequential - std::f64::consts::PI).abs() < 1e-6);

    for threads in [2, 3, 4] {
        let parallel =
            integrate_parallel(0.0, 1.0, 100_000, threads, SlotPolicy::Padded).unwrap();
        assert!((sequential - parallel).abs() < 1e-9);
    }
}

#[test]
fn integrate_rejects_bad_arguments() {
    assert_invalid(integrate_sequential(0.0, 1.0, 0));
    assert_invalid(integrate_sequential(1.0, 0.0, 100));
    assert_invalid(integrate_parallel(0.0, 1.0, 100, 0, SlotPolicy::Padded));
}

// branch prediction inputs

#[test]
fn sorted_and_unsorted_sums_are_identical() {
    let (sorted, unsorted) = branch_inputs(ODD_SIZE, SEED).unwrap();
    assert!(sorted.is_sorted());
    assert_eq!(sum_above(&sorted, 128), sum_above(&unsorted, 128));
}

// comparison runner

#[test]
fn runner_reports_timings_for_agreeing_variants() {
    let values = generate_i32(ODD_SIZE, SEED).unwrap();

    let report = Comparison::new("min_max", Tolerance::Exact)
        .variant("naive", || min_max(&values))
        .variant("ilp", || min_max_ilp(&values))
        .variant("blocks", || min_max_blocks(&values))
        .run()
        .unwrap();

    assert_eq!(report.timings.len(), 3);
    assert_eq!(report.baseline, min_max(&values).unwrap());
}

#[test]
fn runner_detects_divergent_variant() {
    let err = Comparison::new("deliberate_mismatch", Tolerance::Relative(1e-5))
        .variant("baseline", || Ok(1.0f64))
        .variant("agrees", || Ok(1.0f64 + 1e-9))
        .variant("diverges", || Ok(1.25f64))
        .run()
        .unwrap_err();

    match err {
        CompareError::VariantMismatch {
            variant, divergence, ..
        } => {
            assert_eq!(variant, "diverges");
            assert!(divergence > 1e-5);
        }
        other => panic!("expected VariantMismatch, got {other}"),
    }
}

#[test]
fn runner_rejects_empty_comparison() {
    assert_invalid(Comparison::<f64>::new("empty", Tolerance::Exact).run());
}

#[test]
fn runner_propagates_variant_errors() {
    let err = Comparison::new("failing", Tolerance::Exact)
        .variant("bad", || min_max(&[]))
        .run()
        .unwrap_err();
    assert!(matches!(err, CompareError::InvalidArgument(_)));
}
