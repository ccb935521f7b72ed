// Square-matrix kernels: multiply under three loop orders and transpose
// under naive vs tiled traversal.

use crate::LANES;
use crate::error::CompareError;

/// Row-major contiguous square matrix of `f32`.
pub struct MatrixBuffer {
    data: Vec<f32>,
    dim: usize,
}

impl MatrixBuffer {
    pub fn zeroed(dim: usize) -> Result<Self, CompareError> {
        if dim == 0 {
            return Err(CompareError::invalid("matrix dimension must be nonzero"));
        }
        Ok(Self {
            data: vec![0f32; dim * dim],
            dim,
        })
    }

    pub fn from_vec(data: Vec<f32>, dim: usize) -> Result<Self, CompareError> {
        if dim == 0 {
            return Err(CompareError::invalid("matrix dimension must be nonzero"));
        }
        if data.len() != dim * dim {
            return Err(CompareError::invalid(format!(
                "matrix backing length {} does not match dimension {dim}",
                data.len()
            )));
        }
        Ok(Self { data, dim })
    }

    pub fn identity(dim: usize) -> Result<Self, CompareError> {
        let mut m = Self::zeroed(dim)?;
        for i in 0..dim {
            m.data[i * dim + i] = 1.0;
        }
        Ok(m)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

fn check_same_dim(a: &MatrixBuffer, b: &MatrixBuffer, c: &MatrixBuffer) -> Result<(), CompareError> {
    if a.dim != b.dim || a.dim != c.dim {
        return Err(CompareError::invalid(format!(
            "matrix dimensions differ: {} vs {} vs {}",
            a.dim, b.dim, c.dim
        )));
    }
    Ok(())
}

/// Textbook i-j-k multiply. The inner loop walks `b` column-wise, one
/// full row stride per step.
///
/// The output is zeroed on entry, so repeated invocation over the same
/// inputs is safe for timed sweeps.
pub fn mat_mul_naive(
    a: &MatrixBuffer,
    b: &MatrixBuffer,
    c: &mut MatrixBuffer,
) -> Result<(), CompareError> {
    check_same_dim(a, b, c)?;
    c.data.fill(0.0);

    let d = a.dim;
    for i in 0..d {
        for j in 0..d {
            for k in 0..d {
                c.data[i * d + j] += a.data[i * d + k] * b.data[k * d + j];
            }
        }
    }
    Ok(())
}

/// Same multiply with the k and j loops exchanged, so the two inner
/// accesses both run sequentially along rows.
pub fn mat_mul_reordered(
    a: &MatrixBuffer,
    b: &MatrixBuffer,
    c: &mut MatrixBuffer,
) -> Result<(), CompareError> {
    check_same_dim(a, b, c)?;
    c.data.fill(0.0);

    let d = a.dim;
    for i in 0..d {
        for k in 0..d {
            let a_ik = a.data[i * d + k];
            for j in 0..d {
                c.data[i * d + j] += a_ik * b.data[k * d + j];
            }
        }
    }
    Ok(())
}

/// Reordered multiply with the inner row pass done in `LANES`-wide
/// blocks plus a scalar tail, `a[i][k]` broadcast across the block.
pub fn mat_mul_blocks(
    a: &MatrixBuffer,
    b: &MatrixBuffer,
    c: &mut MatrixBuffer,
) -> Result<(), CompareError> {
    check_same_dim(a, b, c)?;
    c.data.fill(0.0);

    let d = a.dim;
    let blocks = d / LANES;

    for i in 0..d {
        for k in 0..d {
            let a_ik = a.data[i * d + k];
            let b_row = &b.data[k * d..(k + 1) * d];
            let c_row = &mut c.data[i * d..(i + 1) * d];

            for blk in 0..blocks {
                let at = blk * LANES;
                for l in 0..LANES {
                    c_row[at + l] += a_ik * b_row[at + l];
                }
            }
            for j in blocks * LANES..d {
                c_row[j] += a_ik * b_row[j];
            }
        }
    }
    Ok(())
}

/// Element-by-element transpose. Reads run along rows, writes jump a
/// full column stride per element.
pub fn transpose_naive(src: &MatrixBuffer, dst: &mut MatrixBuffer) -> Result<(), CompareError> {
    if src.dim != dst.dim {
        return Err(CompareError::invalid(format!(
            "matrix dimensions differ: {} vs {}",
            src.dim, dst.dim
        )));
    }

    let d = src.dim;
    for y in 0..d {
        for x in 0..d {
            dst.data[x * d + y] = src.data[y * d + x];
        }
    }
    Ok(())
}

/// Tiled transpose: the matrix is walked in `tile` x `tile` blocks so
/// both source and destination lines stay resident while a block is
/// processed. Pure data movement, so the result is bit-identical to the
/// naive version.
pub fn transpose_tiled(
    src: &MatrixBuffer,
    dst: &mut MatrixBuffer,
    tile: usize,
) -> Result<(), CompareError> {
    if src.dim != dst.dim {
        return Err(CompareError::invalid(format!(
            "matrix dimensions differ: {} vs {}",
            src.dim, dst.dim
        )));
    }
    if tile == 0 || !src.dim.is_multiple_of(tile) {
        return Err(CompareError::invalid(format!(
            "tile size {tile} does not divide dimension {}",
            src.dim
        )));
    }

    let d = src.dim;
    for y in (0..d).step_by(tile) {
        for x in (0..d).step_by(tile) {
            for by in 0..tile {
                for bx in 0..tile {
                    let from = (y + by) * d + (x + bx);
                    let to = (x + bx) * d + (y + by);
                    dst.data[to] = src.data[from];
                }
            }
        }
    }
    Ok(())
}
