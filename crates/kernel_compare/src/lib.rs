#[cfg(test)]
mod tests;

// Core library for comparing implementations of the same numeric kernel
// under different memory layouts and execution strategies.

pub mod branch;
pub mod dataset;
pub mod elementwise;
pub mod error;
pub mod integrate;
pub mod layout;
pub mod matrix;
pub mod normalize;
pub mod reduce;
pub mod runner;

pub use error::CompareError;

/// Number of primitive values an explicit-vector kernel processes per
/// block. Chosen to match a 256-bit register of `f32`/`i32` lanes; block
/// kernels always carry a scalar tail loop, so correctness never depends
/// on input lengths being a multiple of this.
pub const LANES: usize = 8;

/// Size in bytes of one cache line on the machines these experiments
/// target. Padding for the false-sharing mitigations is derived from it.
pub const CACHE_LINE_BYTES: usize = 64;
