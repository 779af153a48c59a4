use super::optimizer_state::OptimizerState;
use super::outcome::StepOutcome;
use crate::error::GradlessError;

/// Trait defining the common interface for the optimizers.
pub trait Optimizer {
    /// Attempts a single optimization step.
    ///
    /// # Returns
    ///
    /// `Ok(StepOutcome::Accepted { .. })` when the candidate was committed,
    /// `Ok(StepOutcome::Rejected(..))` when a guard vetoed it (no state
    /// changes), or a `GradlessError` for a hard failure such as an objective
    /// error.
    fn step(&mut self) -> Result<StepOutcome, GradlessError>;

    /// Loads the optimizer's state from an `OptimizerState` object.
    ///
    /// # Errors
    ///
    /// Returns a `GradlessError` if the state does not fit this optimizer;
    /// the optimizer is left unchanged in that case.
    fn load_state_dict(&mut self, state_dict: &OptimizerState) -> Result<(), GradlessError>;

    /// Returns the optimizer's current state as an `OptimizerState` object.
    fn state_dict(&self) -> OptimizerState;
}
