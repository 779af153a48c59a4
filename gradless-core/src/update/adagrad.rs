use log::debug;

use super::update_state::{RollbackPoint, UpdateRuleState};
use super::update_trait::UpdateRule;
use crate::error::GradlessError;

/// ADAGRAD: scales each coordinate by the root of its cumulative squared gradient.
///
/// `G += ghat^2`, `delta = step_size * ghat / sqrt(G + eps)`.
#[derive(Debug, Clone)]
pub struct Adagrad {
    eps: f64,
    accumulator: Option<Vec<f64>>,
}

impl Adagrad {
    /// Creates the rule with the given `eps`, which must be positive.
    pub fn new(eps: f64) -> Result<Self, GradlessError> {
        if !(eps.is_finite() && eps > 0.0) {
            return Err(GradlessError::ConfigurationError(format!(
                "Adagrad: epsilon must be positive, got {}",
                eps
            )));
        }
        Ok(Adagrad {
            eps,
            accumulator: None,
        })
    }

    /// Cumulative squared gradients, `None` before the first call.
    pub fn accumulator(&self) -> Option<&[f64]> {
        self.accumulator.as_deref()
    }
}

impl Default for Adagrad {
    fn default() -> Self {
        Adagrad {
            eps: 1e-8,
            accumulator: None,
        }
    }
}

impl UpdateRule for Adagrad {
    fn evaluate(&mut self, ghat: &[f64], step_size: f64, _t: f64) -> Result<Vec<f64>, GradlessError> {
        let accumulator = self
            .accumulator
            .get_or_insert_with(|| vec![0.0; ghat.len()]);
        if accumulator.len() != ghat.len() {
            return Err(GradlessError::ShapeMismatch {
                expected: accumulator.len(),
                actual: ghat.len(),
                operation: "Adagrad accumulator update".to_string(),
            });
        }

        for (acc, g) in accumulator.iter_mut().zip(ghat) {
            *acc += g * g;
        }
        debug!("Adagrad: accumulated squared gradients over {} parameters", ghat.len());

        let eps = self.eps;
        Ok(ghat
            .iter()
            .zip(accumulator.iter())
            .map(|(g, acc)| step_size * g / (acc + eps).sqrt())
            .collect())
    }

    fn state_dict(&self) -> UpdateRuleState {
        UpdateRuleState::Adagrad {
            accumulator: self.accumulator.clone(),
        }
    }

    fn load_state_dict(&mut self, state: &UpdateRuleState) -> Result<(), GradlessError> {
        match state {
            UpdateRuleState::Adagrad { accumulator } => {
                self.accumulator = accumulator.clone();
                Ok(())
            }
            other => Err(UpdateRuleState::wrong_kind("adagrad", other)),
        }
    }

    fn rollback_point(&self) -> RollbackPoint {
        RollbackPoint::Adagrad {
            accumulator: self.accumulator.clone(),
        }
    }

    fn rollback(&mut self, point: RollbackPoint) -> Result<(), GradlessError> {
        match point {
            RollbackPoint::Adagrad { accumulator } => {
                self.accumulator = accumulator;
                Ok(())
            }
            other => Err(RollbackPoint::wrong_kind("adagrad", &other)),
        }
    }
}

#[cfg(test)]
#[path = "adagrad_test.rs"]
mod tests;
