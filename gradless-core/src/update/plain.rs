use super::update_state::{RollbackPoint, UpdateRuleState};
use super::update_trait::UpdateRule;
use crate::error::GradlessError;

/// Plain descent: `delta = step_size * ghat`.
#[derive(Debug, Clone, Default)]
pub struct PlainUpdate;

impl PlainUpdate {
    pub fn new() -> Self {
        PlainUpdate
    }
}

impl UpdateRule for PlainUpdate {
    fn evaluate(&mut self, ghat: &[f64], step_size: f64, _t: f64) -> Result<Vec<f64>, GradlessError> {
        Ok(ghat.iter().map(|g| step_size * g).collect())
    }

    fn state_dict(&self) -> UpdateRuleState {
        UpdateRuleState::Plain
    }

    fn load_state_dict(&mut self, state: &UpdateRuleState) -> Result<(), GradlessError> {
        match state {
            UpdateRuleState::Plain => Ok(()),
            other => Err(UpdateRuleState::wrong_kind("plain", other)),
        }
    }

    fn rollback_point(&self) -> RollbackPoint {
        RollbackPoint::Plain
    }

    fn rollback(&mut self, point: RollbackPoint) -> Result<(), GradlessError> {
        match point {
            RollbackPoint::Plain => Ok(()),
            other => Err(RollbackPoint::wrong_kind("plain", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_scales_gradient() {
        let mut rule = PlainUpdate::new();
        let delta = rule.evaluate(&[1.0, -2.0, 0.5], 0.1, 3.0).unwrap();
        assert_eq!(delta, vec![0.1, -0.2, 0.05]);
        assert_eq!(rule.state_dict(), UpdateRuleState::Plain);
    }

    #[test]
    fn test_plain_rejects_foreign_state() {
        let mut rule = PlainUpdate::new();
        let state = UpdateRuleState::Adagrad { accumulator: None };
        assert!(matches!(rule.load_state_dict(&state), Err(GradlessError::StateError(_))));
    }
}
