use super::update_state::{RollbackPoint, UpdateRuleState};
use crate::error::GradlessError;

/// Trait defining the common interface for parameter update rules.
///
/// A rule maps a gradient estimate and a step size to a delta which the
/// caller subtracts from the current parameters. Rules may carry state
/// (accumulators, moment histories) across calls; that state is advanced by
/// every call, whether or not the caller later commits the step.
pub trait UpdateRule: Send {
    /// Computes the delta for one iteration.
    ///
    /// # Arguments
    ///
    /// * `ghat`: Gradient estimate.
    /// * `step_size`: Parameter step size `a_k` for this iteration.
    /// * `t`: The caller's iteration counter (1 on the first attempt).
    ///
    /// # Returns
    ///
    /// The delta, same length as `ghat`, or a `GradlessError` if `ghat` does
    /// not match the shape of the accumulated state.
    fn evaluate(&mut self, ghat: &[f64], step_size: f64, t: f64) -> Result<Vec<f64>, GradlessError>;

    /// Returns the rule's current internal state.
    fn state_dict(&self) -> UpdateRuleState;

    /// Restores internal state previously produced by `state_dict`.
    ///
    /// # Errors
    ///
    /// Returns `GradlessError::StateError` if `state` belongs to another rule
    /// or is malformed.
    fn load_state_dict(&mut self, state: &UpdateRuleState) -> Result<(), GradlessError>;

    /// Records what `rollback` needs to undo the next `evaluate` call.
    ///
    /// The default captures the full `state_dict()`; rules whose state grows
    /// over time override it with something cheaper.
    fn rollback_point(&self) -> RollbackPoint {
        RollbackPoint::Full(self.state_dict())
    }

    /// Undoes every `evaluate` call made since `point` was recorded.
    ///
    /// # Errors
    ///
    /// Returns `GradlessError::StateError` if `point` was not produced by
    /// this rule or lies ahead of its current state.
    fn rollback(&mut self, point: RollbackPoint) -> Result<(), GradlessError> {
        match point {
            RollbackPoint::Full(state) => self.load_state_dict(&state),
            other => Err(GradlessError::StateError(format!(
                "cannot roll back to a {} point with the default rollback",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Relies on the default rollback, which round-trips the full state.
    struct Counter {
        calls: usize,
    }

    impl UpdateRule for Counter {
        fn evaluate(&mut self, ghat: &[f64], step_size: f64, _t: f64) -> Result<Vec<f64>, GradlessError> {
            self.calls += 1;
            Ok(ghat.iter().map(|g| step_size * g).collect())
        }

        fn state_dict(&self) -> UpdateRuleState {
            UpdateRuleState::Adagrad {
                accumulator: Some(vec![self.calls as f64]),
            }
        }

        fn load_state_dict(&mut self, state: &UpdateRuleState) -> Result<(), GradlessError> {
            match state {
                UpdateRuleState::Adagrad {
                    accumulator: Some(calls),
                } => {
                    self.calls = calls[0] as usize;
                    Ok(())
                }
                other => Err(UpdateRuleState::wrong_kind("counter", other)),
            }
        }
    }

    #[test]
    fn test_default_rollback_uses_full_state() {
        let mut rule = Counter { calls: 0 };
        let point = rule.rollback_point();
        assert!(matches!(point, RollbackPoint::Full(_)));
        rule.evaluate(&[1.0], 0.1, 1.0).unwrap();
        rule.rollback(point).unwrap();
        assert_eq!(rule.calls, 0);
        assert!(matches!(
            rule.rollback(RollbackPoint::Moments { calls: 0 }),
            Err(GradlessError::StateError(_))
        ));
    }
}
