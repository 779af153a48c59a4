use crate::update::UpdateRuleState;

/// Checkpoint of an optimizer.
///
/// Holds everything needed to resume a run: the parameters, the iteration
/// counter, both histories and the update rule's accumulated state.
/// Acceptance rules are not captured and restart from their own
/// initialization. Neither is the optimizer's random generator, so a resumed
/// run draws different perturbations from an uninterrupted one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerState {
    pub theta: Vec<f64>,
    pub t: f64,
    pub theta_history: Vec<Vec<f64>>,
    pub cost_history: Vec<f64>,
    pub update_rule: UpdateRuleState,
}
