// Normalize-in-place kernels.
//
// Each variant divides every record's components by the record's
// Euclidean norm. A zero-norm record divides by zero and propagates NaN;
// this is a performance experiment, not a numerically robust library,
// and the behavior is deliberate.

use rayon::ThreadPool;
use rayon::prelude::*;

use crate::LANES;
use crate::layout::{SoaStore, VectorStore};

/// Scalar normalize through the element-wise store interface. Works on
/// every layout backend; for the boxed and packed layouts this is the
/// only access path, which is the point of the comparison.
pub fn normalize_store<S: VectorStore>(store: &mut S) {
    for i in 0..store.len() {
        let [x, y, z] = store.get(i);
        let norm = (x * x + y * y + z * z).sqrt();
        store.set(i, [x / norm, y / norm, z / norm]);
    }
}

/// Scalar normalize directly over the columnar slices, skipping the
/// per-element trait dispatch.
pub fn normalize_soa(store: &mut SoaStore) {
    let (xs, ys, zs) = store.columns_mut();

    for i in 0..xs.len() {
        let norm = (xs[i] * xs[i] + ys[i] * ys[i] + zs[i] * zs[i]).sqrt();
        xs[i] /= norm;
        ys[i] /= norm;
        zs[i] /= norm;
    }
}

/// Explicit-vector normalize: whole blocks of `LANES` components at a
/// time, with a scalar tail for lengths the block width does not divide.
pub fn normalize_soa_blocks(store: &mut SoaStore) {
    let (xs, ys, zs) = store.columns_mut();
    let blocks = xs.len() / LANES;

    for b in 0..blocks {
        let at = b * LANES;
        let mut vx = [0f32; LANES];
        let mut vy = [0f32; LANES];
        let mut vz = [0f32; LANES];
        vx.copy_from_slice(&xs[at..at + LANES]);
        vy.copy_from_slice(&ys[at..at + LANES]);
        vz.copy_from_slice(&zs[at..at + LANES]);

        for l in 0..LANES {
            let norm = (vx[l] * vx[l] + vy[l] * vy[l] + vz[l] * vz[l]).sqrt();
            vx[l] /= norm;
            vy[l] /= norm;
            vz[l] /= norm;
        }

        xs[at..at + LANES].copy_from_slice(&vx);
        ys[at..at + LANES].copy_from_slice(&vy);
        zs[at..at + LANES].copy_from_slice(&vz);
    }

    for i in blocks * LANES..xs.len() {
        let norm = (xs[i] * xs[i] + ys[i] * ys[i] + zs[i] * zs[i]).sqrt();
        xs[i] /= norm;
        ys[i] /= norm;
        zs[i] /= norm;
    }
}

/// Data-parallel normalize over the columns, run inside the caller's
/// Rayon pool. Each job is one aligned chunk of all three columns.
pub fn normalize_soa_parallel(store: &mut SoaStore, thread_pool: &ThreadPool) {
    if store.is_empty() {
        return;
    }

    let workers = thread_pool.current_num_threads().max(1);
    let (xs, ys, zs) = store.columns_mut();
    let chunk = xs.len().div_ceil(workers);

    thread_pool.install(|| {
        xs.par_chunks_mut(chunk)
            .zip(ys.par_chunks_mut(chunk))
            .zip(zs.par_chunks_mut(chunk))
            .for_each(|((cx, cy), cz)| {
                for i in 0..cx.len() {
                    let norm = (cx[i] * cx[i] + cy[i] * cy[i] + cz[i] * cz[i]).sqrt();
                    cx[i] /= norm;
                    cy[i] /= norm;
                    cz[i] /= norm;
                }
            });
    });
}

/// Collect the normalized components back into one flat vector for
/// cross-variant comparison, in `x0 y0 z0 x1 y1 z1 ...` order.
pub fn flatten<S: VectorStore>(store: &S) -> Vec<f32> {
    let mut out = Vec::with_capacity(store.len() * 3);
    for i in 0..store.len() {
        out.extend_from_slice(&store.get(i));
    }
    out
}
