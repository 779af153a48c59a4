use std::fmt;
use std::hash::Hash;

use log::trace;
use rand::rngs::StdRng;
use rand::Rng;

use super::estimator_trait::GradientEstimator;
use super::subsets::SubsetAssignment;
use crate::error::GradlessError;
use crate::objective::{evaluate_shared, resample_shared, SharedObjective};

/// Draws a symmetric ±1 perturbation, zeroed outside `mask`.
///
/// One Bernoulli(0.5) draw is consumed per entry, masked or not, so the
/// random stream does not depend on how parameters are grouped.
pub fn draw_perturbation<R: Rng>(rng: &mut R, mask: &[bool]) -> Vec<f64> {
    mask.iter()
        .map(|&in_subset| {
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            if in_subset {
                sign
            } else {
                0.0
            }
        })
        .collect()
}

/// Simultaneous Perturbation Stochastic Approximation gradient estimator.
///
/// For each subset, every member parameter is perturbed at once along a
/// random ±1 direction, and the objective is evaluated on both sides:
///
/// `ghat[i] = (f(theta + c_k * delta) - f(theta - c_k * delta)) / (2 * c_k * delta[i])`
///
/// Without a [`SubsetAssignment`] all parameters form one subset.
pub struct SpsaGradient<L = usize> {
    objective: Option<SharedObjective>,
    subsets: Option<SubsetAssignment<L>>,
}

impl SpsaGradient<usize> {
    /// Creates an estimator with no objective and a single implicit subset.
    pub fn new() -> Self {
        SpsaGradient {
            objective: None,
            subsets: None,
        }
    }
}

impl Default for SpsaGradient<usize> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> SpsaGradient<L>
where
    L: Eq + Hash + Clone,
{
    /// Creates an estimator that perturbs each subset of `subsets` in turn.
    pub fn with_subsets(subsets: SubsetAssignment<L>) -> Self {
        SpsaGradient {
            objective: None,
            subsets: Some(subsets),
        }
    }

    /// Binds `objective` at construction.
    pub fn with_objective(mut self, objective: SharedObjective) -> Self {
        self.objective = Some(objective);
        self
    }

    pub fn subsets(&self) -> Option<&SubsetAssignment<L>> {
        self.subsets.as_ref()
    }

    fn masks(&self, n_params: usize) -> Result<Vec<Vec<bool>>, GradlessError> {
        match &self.subsets {
            Some(assignment) => {
                assignment.check_len(n_params)?;
                Ok(assignment.masks())
            }
            None => Ok(vec![vec![true; n_params]]),
        }
    }

    /// One two-sided SPSA pass over the parameters selected by `mask`.
    fn spsa(
        objective: &SharedObjective,
        theta: &[f64],
        c_k: f64,
        mask: &[bool],
        rng: &mut StdRng,
    ) -> Result<Vec<f64>, GradlessError> {
        let delta = draw_perturbation(rng, mask);

        let theta_plus: Vec<f64> = theta
            .iter()
            .zip(&delta)
            .map(|(p, d)| p + c_k * d)
            .collect();
        let theta_minus: Vec<f64> = theta
            .iter()
            .zip(&delta)
            .map(|(p, d)| p - c_k * d)
            .collect();

        let y_plus = evaluate_shared(objective, &theta_plus)?;
        let y_minus = evaluate_shared(objective, &theta_minus)?;
        trace!("SpsaGradient: y_plus = {}, y_minus = {}", y_plus, y_minus);

        let slope = y_plus - y_minus;
        Ok(delta
            .iter()
            .zip(mask)
            .map(|(&d, &in_subset)| {
                if in_subset && d != 0.0 {
                    slope / (2.0 * c_k * d)
                } else {
                    0.0
                }
            })
            .collect())
    }
}

impl<L> GradientEstimator for SpsaGradient<L>
where
    L: Eq + Hash + Clone + Send,
{
    fn objective(&self) -> Option<&SharedObjective> {
        self.objective.as_ref()
    }

    fn set_objective(&mut self, objective: SharedObjective) {
        self.objective = Some(objective);
    }

    fn evaluate(
        &mut self,
        theta: &[f64],
        c_k: f64,
        reps: usize,
        resample: bool,
        rng: &mut StdRng,
    ) -> Result<Vec<f64>, GradlessError> {
        let objective = self.objective.clone().ok_or_else(|| {
            GradlessError::ConfigurationError(
                "SpsaGradient has no objective bound; call set_objective first".to_string(),
            )
        })?;
        if reps == 0 {
            return Err(GradlessError::ConfigurationError(
                "Gradient repetitions must be at least 1".to_string(),
            ));
        }
        if !(c_k.is_finite() && c_k > 0.0) {
            return Err(GradlessError::InvalidStepSize {
                schedule: "perturbation".to_string(),
                t: f64::NAN,
                value: c_k,
            });
        }
        let masks = self.masks(theta.len())?;

        let mut estimates = Vec::with_capacity(reps);
        for rep in 0..reps {
            if resample {
                resample_shared(&objective)?;
            }
            let mut ghat = vec![0.0; theta.len()];
            for (subset_idx, mask) in masks.iter().enumerate() {
                let contribution = Self::spsa(&objective, theta, c_k, mask, rng)?;
                for (g, c) in ghat.iter_mut().zip(contribution) {
                    *g += c;
                }
                trace!("SpsaGradient: rep {}, subset {} done", rep, subset_idx);
            }
            estimates.push(ghat);
        }

        if reps == 1 {
            return Ok(estimates.swap_remove(0));
        }
        let mut mean = vec![0.0; theta.len()];
        for estimate in &estimates {
            for (m, g) in mean.iter_mut().zip(estimate) {
                *m += g;
            }
        }
        let scale = reps as f64;
        mean.iter_mut().for_each(|m| *m /= scale);
        Ok(mean)
    }
}

impl<L: fmt::Debug> fmt::Debug for SpsaGradient<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpsaGradient")
            .field("objective_bound", &self.objective.is_some())
            .field("subsets", &self.subsets)
            .finish()
    }
}

#[cfg(test)]
#[path = "spsa_test.rs"]
mod tests;
