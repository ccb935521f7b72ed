// Default parameter sweep for `perf_lab all`. Each combination runs
// independently; a failure is logged and the sweep moves on, so one bad
// configuration cannot poison the rest of the run.

use kernel_compare::CompareError;

use crate::comparisons;

pub const DEFAULT_SIZES: [usize; 2] = [1 << 16, 1 << 19];
pub const DEFAULT_DIMS: [usize; 2] = [256, 512];
pub const DEFAULT_TILES: [usize; 3] = [8, 16, 32];
pub const DEFAULT_STEPS: usize = 10_000_000;

fn isolate(label: &str, result: Result<(), CompareError>) {
    if let Err(err) = result {
        log::error!("{label}: {err}");
    }
}

/// Run the full cross-product of default parameters.
pub fn run_all(seed: u64, threads: usize) {
    for size in DEFAULT_SIZES {
        isolate(
            "normalize",
            comparisons::run_normalize(size, seed, threads),
        );
        isolate("elementwise", comparisons::run_elementwise(size, seed));
        isolate("min_max", comparisons::run_min_max(size, seed, threads));
        isolate("branch", comparisons::run_branch(size, seed));
    }

    for dim in DEFAULT_DIMS {
        isolate("mat_mul", comparisons::run_mat_mul(dim, seed));
        for tile in DEFAULT_TILES {
            isolate("transpose", comparisons::run_transpose(dim, tile, seed));
        }
    }

    for t in [1, 2, threads.max(1)] {
        isolate("integrate", comparisons::run_integrate(DEFAULT_STEPS, t));
    }
}
