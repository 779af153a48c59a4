use super::schedule::DecaySchedule;
use crate::error::GradlessError;

/// When an update rule's accumulated state may advance.
///
/// The gradient estimate, and therefore the rule's moment update, is computed
/// before the candidate is checked. `EveryAttempt` keeps that update even if
/// the candidate is then rejected; `AcceptedOnly` restores the rule's state
/// whenever the step is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MomentPolicy {
    #[default]
    EveryAttempt,
    AcceptedOnly,
}

/// Hyper-parameters of an [`SpsaOptimizer`](super::SpsaOptimizer).
///
/// Step sizes follow
/// `a_k = param_stepsize / (t + param_decay_offset)^param_stepdecay` and
/// `c_k = grad_stepsize / t^grad_stepdecay`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    pub param_stepsize: f64,
    pub param_stepdecay: f64,
    pub param_decay_offset: f64,
    pub grad_stepsize: f64,
    pub grad_stepdecay: f64,
    /// Gradient estimates averaged per iteration.
    pub gradient_reps: usize,
    /// Resample the objective's random variables before each gradient repetition.
    pub resample: bool,
    /// Outlier guard threshold, in standard deviations of recent costs.
    pub block_val: Option<f64>,
    /// Seed of the optimizer's random source; entropy when `None`.
    pub seed: Option<u64>,
    pub moment_policy: MomentPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            param_stepsize: 1.0,
            param_stepdecay: 0.4,
            param_decay_offset: 0.0,
            grad_stepsize: 1.0,
            grad_stepdecay: 0.2,
            gradient_reps: 1,
            resample: false,
            block_val: None,
            seed: None,
            moment_policy: MomentPolicy::EveryAttempt,
        }
    }
}

impl OptimizerConfig {
    pub fn with_param_step(mut self, stepsize: f64, decay: f64) -> Self {
        self.param_stepsize = stepsize;
        self.param_stepdecay = decay;
        self
    }

    pub fn with_decay_offset(mut self, offset: f64) -> Self {
        self.param_decay_offset = offset;
        self
    }

    pub fn with_grad_step(mut self, stepsize: f64, decay: f64) -> Self {
        self.grad_stepsize = stepsize;
        self.grad_stepdecay = decay;
        self
    }

    pub fn with_gradient_reps(mut self, reps: usize) -> Self {
        self.gradient_reps = reps;
        self
    }

    pub fn with_resample(mut self, resample: bool) -> Self {
        self.resample = resample;
        self
    }

    pub fn with_block_val(mut self, block_val: f64) -> Self {
        self.block_val = Some(block_val);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_moment_policy(mut self, policy: MomentPolicy) -> Self {
        self.moment_policy = policy;
        self
    }

    /// Schedule of the parameter step size `a_k`.
    pub fn param_schedule(&self) -> DecaySchedule {
        DecaySchedule::new(
            "param_step",
            self.param_stepsize,
            self.param_stepdecay,
            self.param_decay_offset,
        )
    }

    /// Schedule of the perturbation size `c_k`.
    pub fn grad_schedule(&self) -> DecaySchedule {
        DecaySchedule::new("grad_step", self.grad_stepsize, self.grad_stepdecay, 0.0)
    }

    /// Checks every field; called once by the optimizer constructor.
    pub fn validate(&self) -> Result<(), GradlessError> {
        let positive = [
            ("param_stepsize", self.param_stepsize),
            ("grad_stepsize", self.grad_stepsize),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GradlessError::ConfigurationError(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("param_stepdecay", self.param_stepdecay),
            ("grad_stepdecay", self.grad_stepdecay),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GradlessError::ConfigurationError(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        // The a_k base is t + offset with t >= 1.
        if !(self.param_decay_offset.is_finite() && self.param_decay_offset > -1.0) {
            return Err(GradlessError::ConfigurationError(format!(
                "param_decay_offset must be finite and greater than -1, got {}",
                self.param_decay_offset
            )));
        }
        if self.gradient_reps == 0 {
            return Err(GradlessError::ConfigurationError(
                "gradient_reps must be at least 1".to_string(),
            ));
        }
        if let Some(block_val) = self.block_val {
            if !(block_val.is_finite() && block_val > 0.0) {
                return Err(GradlessError::ConfigurationError(format!(
                    "block_val must be finite and positive, got {}",
                    block_val
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.param_stepdecay, 0.4);
        assert_eq!(config.grad_stepdecay, 0.2);
        assert_eq!(config.moment_policy, MomentPolicy::EveryAttempt);
    }

    #[test]
    fn test_invalid_fields_are_reported() {
        let cases = [
            OptimizerConfig::default().with_param_step(0.0, 0.4),
            OptimizerConfig::default().with_grad_step(f64::NAN, 0.2),
            OptimizerConfig::default().with_param_step(1.0, -0.1),
            OptimizerConfig::default().with_decay_offset(-1.0),
            OptimizerConfig::default().with_gradient_reps(0),
            OptimizerConfig::default().with_block_val(0.0),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(GradlessError::ConfigurationError(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_builders_chain() {
        let config = OptimizerConfig::default()
            .with_param_step(0.1, 0.602)
            .with_grad_step(0.2, 0.101)
            .with_decay_offset(10.0)
            .with_gradient_reps(3)
            .with_resample(true)
            .with_block_val(4.0)
            .with_seed(99)
            .with_moment_policy(MomentPolicy::AcceptedOnly);
        assert!(config.validate().is_ok());
        assert_eq!(config.gradient_reps, 3);
        assert_eq!(config.block_val, Some(4.0));
        assert_eq!(config.seed, Some(99));
    }
}
