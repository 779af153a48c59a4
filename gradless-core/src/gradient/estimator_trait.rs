use rand::rngs::StdRng;

use crate::error::GradlessError;
use crate::objective::SharedObjective;

/// Trait defining the common interface for gradient estimators.
///
/// An estimator is bound to an objective, either at construction or by the
/// optimizer that owns it, and produces a gradient estimate with the same
/// length as the parameter vector it is given.
pub trait GradientEstimator: Send {
    /// The objective this estimator evaluates, if one has been bound.
    fn objective(&self) -> Option<&SharedObjective>;

    /// Binds (or rebinds) the objective.
    fn set_objective(&mut self, objective: SharedObjective);

    /// Estimates the gradient at `theta`.
    ///
    /// # Arguments
    ///
    /// * `theta`: Current parameters.
    /// * `c_k`: Perturbation scale for this iteration.
    /// * `reps`: Number of independent estimates to average (at least 1).
    /// * `resample`: Ask the objective to resample its randomness before each repetition.
    /// * `rng`: The caller's random source.
    ///
    /// # Errors
    ///
    /// Returns `GradlessError::ConfigurationError` if no objective is bound,
    /// and propagates objective failures.
    fn evaluate(
        &mut self,
        theta: &[f64],
        c_k: f64,
        reps: usize,
        resample: bool,
        rng: &mut StdRng,
    ) -> Result<Vec<f64>, GradlessError>;
}
