// Error taxonomy for the comparison harness.
//
// Every failure aborts the current parameter set only; callers sweeping
// several parameter sets are expected to log and move on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    /// A parameter was rejected at setup time, before any kernel ran.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two variants of the same comparison disagreed beyond the declared
    /// tolerance. This is the harness's core correctness gate.
    #[error(
        "variant mismatch in '{comparison}': '{variant}' diverges from \
         baseline '{baseline}' by {divergence:e} (tolerance {tolerance:e})"
    )]
    VariantMismatch {
        comparison: String,
        baseline: &'static str,
        variant: &'static str,
        divergence: f64,
        tolerance: f64,
    },

    /// A parallel worker panicked; surfaced after the join barrier.
    #[error("worker {worker} failed: {message}")]
    WorkerFailure { worker: usize, message: String },
}

impl CompareError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Best-effort extraction of a panic payload for `WorkerFailure`.
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
