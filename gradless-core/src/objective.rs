//! The objective contract consumed by the optimizers.
//!
//! An objective maps a parameter vector to a scalar cost. It may hold random
//! variables of its own (for example a Monte Carlo draw); `sample_rvs`
//! regenerates them and is invoked by the gradient estimator when resampling
//! is requested.

use std::fmt;
use std::sync::{Arc, RwLock};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;

use crate::error::GradlessError;

/// Scalar cost to be minimised.
pub trait Objective: Send + Sync {
    /// Evaluates the cost at `theta`.
    ///
    /// A NaN result is a legitimate answer (the optimizer rejects the
    /// candidate); an `Err` is a hard failure that aborts the step.
    fn evaluate(&self, theta: &[f64]) -> Result<f64, GradlessError>;

    /// Regenerates any internal randomness the cost depends on.
    ///
    /// Deterministic objectives keep the default no-op.
    fn sample_rvs(&mut self) {}
}

/// Handle shared by an optimizer and its gradient estimator.
pub type SharedObjective = Arc<RwLock<dyn Objective>>;

/// Wraps an objective into a [`SharedObjective`] handle.
pub fn shared<O: Objective + 'static>(objective: O) -> SharedObjective {
    Arc::new(RwLock::new(objective))
}

pub(crate) fn evaluate_shared(
    objective: &SharedObjective,
    theta: &[f64],
) -> Result<f64, GradlessError> {
    let guard = objective.read().map_err(|e| GradlessError::LockError {
        lock_type: "read".to_string(),
        reason: format!("Failed to lock objective for evaluation: {}", e),
    })?;
    guard.evaluate(theta)
}

pub(crate) fn resample_shared(objective: &SharedObjective) -> Result<(), GradlessError> {
    let mut guard = objective.write().map_err(|e| GradlessError::LockError {
        lock_type: "write".to_string(),
        reason: format!("Failed to lock objective for resampling: {}", e),
    })?;
    guard.sample_rvs();
    Ok(())
}

/// A deterministic objective built from a closure.
pub struct FnObjective<F> {
    cost: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(cost: F) -> Self {
        FnObjective { cost }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, theta: &[f64]) -> Result<f64, GradlessError> {
        Ok((self.cost)(theta))
    }
}

impl<F> fmt::Debug for FnObjective<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective").finish_non_exhaustive()
    }
}

/// An objective whose cost also depends on a vector of random draws `z`.
///
/// `z` stays fixed between calls to [`Objective::sample_rvs`], so both sides
/// of a perturbation see the same realisation unless resampling is requested.
pub struct StochasticObjective<F, D> {
    cost: F,
    distribution: D,
    z: Vec<f64>,
    rng: StdRng,
}

impl<F, D> StochasticObjective<F, D>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
    D: Distribution<f64> + Send + Sync,
{
    /// Creates the objective and draws an initial `z` of length `dim`.
    ///
    /// # Arguments
    ///
    /// * `cost`: Cost closure receiving `(theta, z)`.
    /// * `distribution`: Distribution each entry of `z` is drawn from.
    /// * `dim`: Number of random variables.
    /// * `seed`: Seed for the objective's private generator; entropy when `None`.
    pub fn new(cost: F, distribution: D, dim: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut objective = StochasticObjective {
            cost,
            distribution,
            z: Vec::with_capacity(dim),
            rng,
        };
        objective.z = objective.draw(dim);
        objective
    }

    /// The current realisation of the random variables.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    fn draw(&mut self, dim: usize) -> Vec<f64> {
        (0..dim)
            .map(|_| self.distribution.sample(&mut self.rng))
            .collect()
    }
}

impl<F, D> Objective for StochasticObjective<F, D>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
    D: Distribution<f64> + Send + Sync,
{
    fn evaluate(&self, theta: &[f64]) -> Result<f64, GradlessError> {
        Ok((self.cost)(theta, &self.z))
    }

    fn sample_rvs(&mut self) {
        let dim = self.z.len();
        self.z = self.draw(dim);
    }
}

impl<F, D> fmt::Debug for StochasticObjective<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StochasticObjective")
            .field("z", &self.z)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "objective_test.rs"]
mod tests;
