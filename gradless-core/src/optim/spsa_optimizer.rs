use std::fmt;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::{MomentPolicy, OptimizerConfig};
use super::guards::outlier_limit;
use super::optimizer_state::OptimizerState;
use super::optimizer_trait::Optimizer;
use super::outcome::{FitReport, RejectionReason, StepOutcome};
use super::schedule::DecaySchedule;
use crate::acceptance::{AcceptanceRule, OptimizerContext};
use crate::error::GradlessError;
use crate::gradient::{GradientEstimator, SpsaGradient};
use crate::objective::{evaluate_shared, SharedObjective};
use crate::update::UpdateRule;

/// Stochastic-approximation optimizer driven by a gradient estimator.
///
/// Each `step()` increments the iteration counter `t`, estimates the gradient
/// with perturbation size `c_k`, asks the update rule for a delta scaled by
/// `a_k`, and evaluates the objective at `theta - delta`. The candidate is
/// then screened by three guards in order: NaN cost, the acceptance rule,
/// and the outlier guard. A rejected candidate leaves `theta` and both
/// histories untouched and rolls `t` back, so at rest `t` equals the number
/// of committed steps.
pub struct SpsaOptimizer {
    theta: Vec<f64>,
    t: f64,
    theta_history: Vec<Vec<f64>>,
    cost_history: Vec<f64>,
    objective: SharedObjective,
    gradient: Box<dyn GradientEstimator>,
    update: Box<dyn UpdateRule>,
    acceptance: Option<Box<dyn AcceptanceRule>>,
    config: OptimizerConfig,
    param_schedule: DecaySchedule,
    grad_schedule: DecaySchedule,
    rng: StdRng,
}

impl SpsaOptimizer {
    /// Creates an optimizer with the default SPSA estimator and no acceptance rule.
    pub fn new(
        x_0: Vec<f64>,
        objective: SharedObjective,
        update: Box<dyn UpdateRule>,
        config: OptimizerConfig,
    ) -> Result<Self, GradlessError> {
        Self::with_components(x_0, objective, update, None, None, config)
    }

    /// Creates an optimizer from explicit components.
    ///
    /// # Arguments
    ///
    /// * `x_0`: Starting parameters.
    /// * `objective`: Cost to minimise. Evaluated once here to seed the cost history.
    /// * `update`: Update rule.
    /// * `gradient`: Gradient estimator; a plain `SpsaGradient` when `None`.
    ///   If it has no objective bound yet, `objective` is bound to it.
    /// * `acceptance`: Optional acceptance rule, initialized here.
    /// * `config`: Hyper-parameters, validated here.
    ///
    /// # Errors
    ///
    /// `GradlessError::ConfigurationError` for an invalid configuration, an
    /// empty `x_0`, an objective that fails at `x_0`, or an acceptance rule
    /// that fails to initialize.
    pub fn with_components(
        x_0: Vec<f64>,
        objective: SharedObjective,
        update: Box<dyn UpdateRule>,
        gradient: Option<Box<dyn GradientEstimator>>,
        acceptance: Option<Box<dyn AcceptanceRule>>,
        config: OptimizerConfig,
    ) -> Result<Self, GradlessError> {
        config.validate()?;
        if x_0.is_empty() {
            return Err(GradlessError::ConfigurationError(
                "Starting parameter vector must not be empty".to_string(),
            ));
        }

        let initial_cost = evaluate_shared(&objective, &x_0).map_err(|e| {
            GradlessError::ConfigurationError(format!(
                "Objective must return a scalar cost at the starting point: {}",
                e
            ))
        })?;
        if initial_cost.is_nan() {
            warn!("SpsaOptimizer: starting cost is NaN");
        }

        let mut gradient: Box<dyn GradientEstimator> = match gradient {
            Some(gradient) => gradient,
            None => Box::new(SpsaGradient::new()),
        };
        if gradient.objective().is_none() {
            gradient.set_objective(objective.clone());
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut optimizer = SpsaOptimizer {
            theta: x_0.clone(),
            t: 0.0,
            theta_history: vec![x_0],
            cost_history: vec![initial_cost],
            objective,
            gradient,
            update,
            acceptance: None,
            param_schedule: config.param_schedule(),
            grad_schedule: config.grad_schedule(),
            config,
            rng,
        };

        if let Some(mut rule) = acceptance {
            rule.initialize(&optimizer.context())?;
            optimizer.acceptance = Some(rule);
        }
        debug!(
            "SpsaOptimizer: initialized with {} parameters, starting cost {}",
            optimizer.theta.len(),
            initial_cost
        );
        Ok(optimizer)
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Iteration counter; equals the number of committed steps between calls.
    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn theta_history(&self) -> &[Vec<f64>] {
        &self.theta_history
    }

    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    /// Cost of the current parameters.
    pub fn last_cost(&self) -> f64 {
        // The history always holds the starting cost.
        self.cost_history.last().copied().unwrap_or(f64::NAN)
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn objective(&self) -> &SharedObjective {
        &self.objective
    }

    /// Parameter step size `a_k` at the current `t`.
    pub fn param_step(&self) -> Result<f64, GradlessError> {
        self.param_schedule.at(self.t)
    }

    /// Perturbation size `c_k` at the current `t`; undefined before the first step.
    pub fn grad_step(&self) -> Result<f64, GradlessError> {
        self.grad_schedule.at(self.t)
    }

    /// Read-only view handed to acceptance rules.
    pub fn context(&self) -> OptimizerContext<'_> {
        OptimizerContext {
            config: &self.config,
            theta: &self.theta,
            t: self.t,
            cost_history: &self.cost_history,
            theta_history: &self.theta_history,
        }
    }

    /// Attempts `n_iter` steps, committed or not.
    pub fn fit(&mut self, n_iter: usize) -> Result<FitReport, GradlessError> {
        self.fit_until(n_iter, |_| false)
    }

    /// Attempts up to `max_iter` steps, stopping early once `converged`
    /// holds after a committed step.
    pub fn fit_until<P>(&mut self, max_iter: usize, mut converged: P) -> Result<FitReport, GradlessError>
    where
        P: FnMut(&SpsaOptimizer) -> bool,
    {
        let mut report = FitReport::default();
        for _ in 0..max_iter {
            let outcome = self.step()?;
            report.record(&outcome);
            if outcome.is_accepted() && converged(self) {
                break;
            }
        }
        debug!(
            "SpsaOptimizer: fit finished after {} attempts ({} accepted)",
            report.attempted, report.accepted
        );
        Ok(report)
    }

    /// Attempts steps until `n_accepted` have been committed or
    /// `max_attempts` have been made.
    pub fn fit_accepted(&mut self, n_accepted: usize, max_attempts: usize) -> Result<FitReport, GradlessError> {
        let mut report = FitReport::default();
        while report.accepted < n_accepted && report.attempted < max_attempts {
            let outcome = self.step()?;
            report.record(&outcome);
        }
        Ok(report)
    }

    /// One trial at the already-incremented counter. Never touches `t`.
    fn attempt(&mut self) -> Result<StepOutcome, GradlessError> {
        let t = self.t;
        let c_k = self.grad_schedule.at(t)?;
        let ghat = self.gradient.evaluate(
            &self.theta,
            c_k,
            self.config.gradient_reps,
            self.config.resample,
            &mut self.rng,
        )?;

        let a_k = self.param_schedule.at(t)?;
        let delta = self.update.evaluate(&ghat, a_k, t)?;
        if delta.len() != self.theta.len() {
            return Err(GradlessError::ShapeMismatch {
                expected: self.theta.len(),
                actual: delta.len(),
                operation: "update rule delta".to_string(),
            });
        }

        let candidate: Vec<f64> = self
            .theta
            .iter()
            .zip(&delta)
            .map(|(p, d)| p - d)
            .collect();
        let new_cost = evaluate_shared(&self.objective, &candidate)?;
        debug!(
            "SpsaOptimizer: t = {}, c_k = {:.4e}, a_k = {:.4e}, candidate cost = {}",
            t, c_k, a_k, new_cost
        );

        if new_cost.is_nan() {
            return Ok(StepOutcome::Rejected(RejectionReason::NotANumber));
        }
        if let Some(rule) = self.acceptance.as_mut() {
            if !rule.evaluate(new_cost, t) {
                return Ok(StepOutcome::Rejected(RejectionReason::Vetoed));
            }
        }
        if let Some(block_val) = self.config.block_val {
            if let Some(limit) = outlier_limit(&self.cost_history, block_val) {
                if new_cost > limit {
                    return Ok(StepOutcome::Rejected(RejectionReason::Outlier { limit }));
                }
            }
        }

        self.theta_history.push(candidate.clone());
        self.theta = candidate;
        self.cost_history.push(new_cost);
        if let Some(rule) = self.acceptance.as_mut() {
            rule.on_commit(new_cost, t);
        }
        Ok(StepOutcome::Accepted { cost: new_cost })
    }
}

impl Optimizer for SpsaOptimizer {
    fn step(&mut self) -> Result<StepOutcome, GradlessError> {
        let rollback_point = match self.config.moment_policy {
            MomentPolicy::AcceptedOnly => Some(self.update.rollback_point()),
            MomentPolicy::EveryAttempt => None,
        };

        self.t += 1.0;
        let result = self.attempt();
        let committed = matches!(result, Ok(StepOutcome::Accepted { .. }));
        if !committed {
            self.t -= 1.0;
            if let Some(point) = rollback_point {
                self.update.rollback(point)?;
            }
        }

        if let Ok(outcome) = &result {
            debug!("SpsaOptimizer: step outcome {:?}, t = {}", outcome, self.t);
        }
        result
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState) -> Result<(), GradlessError> {
        if state_dict.theta.len() != self.theta.len() {
            return Err(GradlessError::ShapeMismatch {
                expected: self.theta.len(),
                actual: state_dict.theta.len(),
                operation: "load_state_dict theta".to_string(),
            });
        }
        if !(state_dict.t.is_finite() && state_dict.t >= 0.0) {
            return Err(GradlessError::StateError(format!(
                "iteration counter must be finite and non-negative, got {}",
                state_dict.t
            )));
        }
        if state_dict.cost_history.is_empty()
            || state_dict.cost_history.len() != state_dict.theta_history.len()
        {
            return Err(GradlessError::StateError(format!(
                "histories must be non-empty and of equal length, got {} costs and {} parameter vectors",
                state_dict.cost_history.len(),
                state_dict.theta_history.len()
            )));
        }
        if state_dict.theta_history.last() != Some(&state_dict.theta) {
            return Err(GradlessError::StateError(
                "last parameter history entry must equal theta".to_string(),
            ));
        }
        if let Some(entry) = state_dict
            .theta_history
            .iter()
            .find(|entry| entry.len() != self.theta.len())
        {
            return Err(GradlessError::ShapeMismatch {
                expected: self.theta.len(),
                actual: entry.len(),
                operation: "load_state_dict theta_history".to_string(),
            });
        }
        state_dict.update_rule.check_len(self.theta.len())?;

        self.update.load_state_dict(&state_dict.update_rule)?;
        warn!(
            "SpsaOptimizer: replacing live state at t = {} with checkpoint at t = {}",
            self.t, state_dict.t
        );
        self.theta = state_dict.theta.clone();
        self.t = state_dict.t;
        self.theta_history = state_dict.theta_history.clone();
        self.cost_history = state_dict.cost_history.clone();
        Ok(())
    }

    fn state_dict(&self) -> OptimizerState {
        OptimizerState {
            theta: self.theta.clone(),
            t: self.t,
            theta_history: self.theta_history.clone(),
            cost_history: self.cost_history.clone(),
            update_rule: self.update.state_dict(),
        }
    }
}

impl fmt::Debug for SpsaOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpsaOptimizer")
            .field("theta", &self.theta)
            .field("t", &self.t)
            .field("committed_steps", &(self.cost_history.len() - 1))
            .field("last_cost", &self.last_cost())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "spsa_optimizer_test.rs"]
mod tests;
