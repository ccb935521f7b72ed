// Comparison runner: registers named variants of one computation, times
// each, and enforces that they all agree on the output. A benchmark
// that silently compares nothing verifies nothing, so the agreement
// check always runs.

use std::time::{Duration, Instant};

use crate::error::CompareError;

/// Per-kernel agreement requirement. Pure data movement and
/// order-insensitive reductions declare `Exact`; anything that reorders
/// floating-point summation declares a `Relative` bound.
#[derive(Clone, Copy, Debug)]
pub enum Tolerance {
    Exact,
    Relative(f64),
}

impl Tolerance {
    fn limit(self) -> f64 {
        match self {
            Self::Exact => 0.0,
            Self::Relative(t) => t,
        }
    }
}

/// Magnitude of disagreement between two variant outputs. Zero means
/// equal; the runner compares it against the declared tolerance.
pub trait Divergence {
    fn divergence(&self, other: &Self) -> f64;
}

fn relative_diff_f64(a: f64, b: f64) -> f64 {
    if a == b || (a.is_nan() && b.is_nan()) {
        return 0.0;
    }
    let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
    (a - b).abs() / scale
}

impl Divergence for f64 {
    fn divergence(&self, other: &Self) -> f64 {
        relative_diff_f64(*self, *other)
    }
}

impl Divergence for f32 {
    fn divergence(&self, other: &Self) -> f64 {
        relative_diff_f64(*self as f64, *other as f64)
    }
}

impl Divergence for Vec<f32> {
    fn divergence(&self, other: &Self) -> f64 {
        if self.len() != other.len() {
            return f64::INFINITY;
        }
        self.iter()
            .zip(other)
            .map(|(&a, &b)| relative_diff_f64(a as f64, b as f64))
            .fold(0.0, f64::max)
    }
}

impl Divergence for (i32, i32) {
    fn divergence(&self, other: &Self) -> f64 {
        let d0 = (self.0 as i64 - other.0 as i64).abs();
        let d1 = (self.1 as i64 - other.1 as i64).abs();
        d0.max(d1) as f64
    }
}

impl Divergence for i64 {
    fn divergence(&self, other: &Self) -> f64 {
        self.abs_diff(*other) as f64
    }
}

type VariantFn<'a, T> = Box<dyn FnMut() -> Result<T, CompareError> + 'a>;

struct Variant<'a, T> {
    name: &'static str,
    run: VariantFn<'a, T>,
}

/// Wall time of one variant invocation.
#[derive(Debug)]
pub struct VariantTiming {
    pub name: &'static str,
    pub elapsed: Duration,
}

/// Outcome of a comparison in which every variant agreed.
#[derive(Debug)]
pub struct ComparisonReport<T> {
    pub name: String,
    pub baseline: T,
    pub timings: Vec<VariantTiming>,
}

impl<T> ComparisonReport<T> {
    /// Log one line per variant with its time and ratio to the first
    /// (baseline) variant.
    pub fn log(&self) {
        let base = self.timings[0].elapsed.as_secs_f64();
        for timing in &self.timings {
            let ratio = timing.elapsed.as_secs_f64() / base.max(f64::MIN_POSITIVE);
            log::info!(
                "{}/{:<24} {:>12.3?}  ({ratio:.2}x baseline)",
                self.name,
                timing.name,
                timing.elapsed,
            );
        }
    }
}

/// A named set of variants of the same computation over the same input,
/// with one tolerance for the whole set. The first registered variant
/// is the baseline the others are checked against.
pub struct Comparison<'a, T> {
    name: String,
    tolerance: Tolerance,
    variants: Vec<Variant<'a, T>>,
}

impl<'a, T: Divergence> Comparison<'a, T> {
    pub fn new(name: impl Into<String>, tolerance: Tolerance) -> Self {
        Self {
            name: name.into(),
            tolerance,
            variants: Vec::new(),
        }
    }

    pub fn variant(
        mut self,
        name: &'static str,
        run: impl FnMut() -> Result<T, CompareError> + 'a,
    ) -> Self {
        self.variants.push(Variant {
            name,
            run: Box::new(run),
        });
        self
    }

    /// Run every variant once, timed, then verify agreement against the
    /// baseline. Any `VariantMismatch` names the divergent variant and
    /// the magnitude of divergence.
    pub fn run(mut self) -> Result<ComparisonReport<T>, CompareError> {
        if self.variants.is_empty() {
            return Err(CompareError::invalid(format!(
                "comparison '{}' has no variants registered",
                self.name
            )));
        }

        let mut outputs = Vec::with_capacity(self.variants.len());
        let mut timings = Vec::with_capacity(self.variants.len());

        for variant in &mut self.variants {
            let start = Instant::now();
            let output = (variant.run)()?;
            timings.push(VariantTiming {
                name: variant.name,
                elapsed: start.elapsed(),
            });
            outputs.push(output);
        }

        let baseline_name = self.variants[0].name;
        let limit = self.tolerance.limit();

        let mut outputs = outputs.into_iter();
        let baseline = outputs.next().expect("at least one variant");

        for (output, variant) in outputs.zip(&self.variants[1..]) {
            let divergence = baseline.divergence(&output);
            if divergence > limit {
                return Err(CompareError::VariantMismatch {
                    comparison: self.name,
                    baseline: baseline_name,
                    variant: variant.name,
                    divergence,
                    tolerance: limit,
                });
            }
        }

        Ok(ComparisonReport {
            name: self.name,
            baseline,
            timings,
        })
    }
}
