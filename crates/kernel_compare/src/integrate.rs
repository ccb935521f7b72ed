// Midpoint-rule integration of 4 / (1 + x²), the classic cache
// invalidation experiment: parallel workers accumulate partial sums
// directly into shared slots, and the slot spacing decides whether the
// threads fight over a cache line.

use std::thread;

use crate::error::{CompareError, panic_message};
use crate::reduce::SlotPolicy;

fn f(x: f64) -> f64 {
    4.0 / (1.0 + x * x)
}

fn check_args(steps: usize, from: f64, to: f64) -> Result<(), CompareError> {
    if steps == 0 {
        return Err(CompareError::invalid("step count must be nonzero"));
    }
    if !(from < to) {
        return Err(CompareError::invalid(format!(
            "integration range [{from}, {to}] is empty"
        )));
    }
    Ok(())
}

/// Accumulate into `slot` on every step; this per-iteration store to a
/// shared array is what makes the adjacent-slot parallel variant churn
/// cache lines.
fn integrate_into(from: f64, to: f64, steps: usize, slot: &mut f64) {
    *slot = 0.0;
    let step = (to - from) / steps as f64;
    for i in 0..steps {
        *slot += step * f(from + (i as f64 + 0.5) * step);
    }
}

/// Single-threaded reference.
pub fn integrate_sequential(from: f64, to: f64, steps: usize) -> Result<f64, CompareError> {
    check_args(steps, from, to)?;

    let mut integral = 0.0;
    integrate_into(from, to, steps, &mut integral);
    Ok(integral)
}

/// Fan out `threads` scoped workers, one contiguous sub-range each (the
/// last worker absorbs the remainder steps), partials written into
/// shared slots spaced per `policy`, then summed in slot order after the
/// join barrier. Padded and adjacent runs combine the same partials in
/// the same order, so their results are bit-identical.
pub fn integrate_parallel(
    from: f64,
    to: f64,
    steps: usize,
    threads: usize,
    policy: SlotPolicy,
) -> Result<f64, CompareError> {
    check_args(steps, from, to)?;
    if threads == 0 {
        return Err(CompareError::invalid("thread count must be nonzero"));
    }

    let stride = policy.stride::<f64>();
    let mut partials = vec![0f64; threads * stride];

    let chunk_steps = steps / threads;
    let span = (to - from) / steps as f64;

    thread::scope(|s| {
        let handles: Vec<_> = partials
            .chunks_mut(stride)
            .enumerate()
            .map(|(w, slot)| {
                let step_from = w * chunk_steps;
                let step_to = if w == threads - 1 {
                    steps
                } else {
                    (w + 1) * chunk_steps
                };

                let my_from = from + step_from as f64 * span;
                let my_to = from + step_to as f64 * span;
                let my_steps = step_to - step_from;

                let handle = s.spawn(move || {
                    if my_steps > 0 {
                        integrate_into(my_from, my_to, my_steps, &mut slot[0]);
                    }
                });
                (w, handle)
            })
            .collect();

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

    Ok(partials.iter().step_by(stride).sum())
}
