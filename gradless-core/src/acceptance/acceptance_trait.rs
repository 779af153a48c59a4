use crate::error::GradlessError;
use crate::optim::config::OptimizerConfig;

/// Read-only view of an optimizer handed to acceptance rules.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerContext<'a> {
    pub config: &'a OptimizerConfig,
    pub theta: &'a [f64],
    pub t: f64,
    pub cost_history: &'a [f64],
    pub theta_history: &'a [Vec<f64>],
}

impl<'a> OptimizerContext<'a> {
    /// Cost of the most recently committed parameters.
    pub fn last_cost(&self) -> Option<f64> {
        self.cost_history.last().copied()
    }
}

/// Trait defining a veto policy over candidate steps.
///
/// A `false` from `evaluate` rejects the candidate; the optimizer then leaves
/// its parameters and histories untouched and rolls back its iteration counter.
pub trait AcceptanceRule: Send {
    /// Called once when the optimizer is constructed, to set up any adaptive
    /// state (a temperature, a tolerance) from the optimizer's configuration
    /// and starting point.
    fn initialize(&mut self, context: &OptimizerContext<'_>) -> Result<(), GradlessError>;

    /// Decides whether a candidate with cost `candidate_cost` may be committed
    /// at iteration `t`.
    fn evaluate(&mut self, candidate_cost: f64, t: f64) -> bool;

    /// Notified after a candidate has been committed.
    ///
    /// Later guards can still reject a candidate this rule accepted, so rules
    /// that track the committed trajectory should update it here.
    fn on_commit(&mut self, _cost: f64, _t: f64) {}
}
