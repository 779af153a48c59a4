use thiserror::Error;

/// Custom error type for the gradless optimizers.
///
/// Only hard failures live here. A candidate step that produces a NaN cost or
/// is vetoed by a guard is not an error: see [`crate::optim::StepOutcome`].
#[derive(Error, Debug, PartialEq, Clone)]
pub enum GradlessError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Shape mismatch: expected {expected}, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Objective evaluation failed: {0}")]
    ObjectiveError(String),

    #[error("Step size schedule '{schedule}' produced an invalid value {value} at t = {t}")]
    InvalidStepSize {
        schedule: String,
        t: f64,
        value: f64,
    },

    #[error("Failed to acquire {lock_type} lock: {reason}")]
    LockError { lock_type: String, reason: String },

    #[error("Invalid optimizer state: {0}")]
    StateError(String),
}
