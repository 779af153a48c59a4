use super::update_state::{MomentHistory, RollbackPoint, UpdateRuleState};
use super::update_trait::UpdateRule;
use super::{check_betas, check_iteration};
use crate::error::GradlessError;

/// ADAM update rule.
///
/// Keeps geometrically decayed first and second moment histories and applies
/// the bias-corrected step
/// `delta = step_size * m_hat / (sqrt(v_hat) + eps)` with
/// `m_hat = m_t / (1 - beta1^t)` and `v_hat = v_t / (1 - beta2^t)`.
///
/// `t` is the caller's iteration counter, not a private one.
#[derive(Debug, Clone)]
pub struct Adam {
    beta1: f64,
    beta2: f64,
    eps: f64,
    moments: MomentHistory,
}

impl Adam {
    pub fn new(beta1: f64, beta2: f64, eps: f64) -> Result<Self, GradlessError> {
        check_betas("Adam", beta1, beta2, eps)?;
        Ok(Adam {
            beta1,
            beta2,
            eps,
            moments: MomentHistory::new(),
        })
    }

    pub fn moments(&self) -> &MomentHistory {
        &self.moments
    }
}

impl Default for Adam {
    fn default() -> Self {
        Adam {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            moments: MomentHistory::new(),
        }
    }
}

impl UpdateRule for Adam {
    fn evaluate(&mut self, ghat: &[f64], step_size: f64, t: f64) -> Result<Vec<f64>, GradlessError> {
        check_iteration("Adam", t)?;
        self.moments.push(ghat, self.beta1, self.beta2)?;
        let (m_t, v_t) = self.moments.latest();

        let bias_correction1 = 1.0 - self.beta1.powf(t);
        let bias_correction2 = 1.0 - self.beta2.powf(t);

        Ok(m_t
            .iter()
            .zip(v_t)
            .map(|(m, v)| {
                let m_hat = m / bias_correction1;
                let v_hat = v / bias_correction2;
                step_size * m_hat / (v_hat.sqrt() + self.eps)
            })
            .collect())
    }

    fn state_dict(&self) -> UpdateRuleState {
        UpdateRuleState::Adam {
            moments: self.moments.clone(),
        }
    }

    fn load_state_dict(&mut self, state: &UpdateRuleState) -> Result<(), GradlessError> {
        match state {
            UpdateRuleState::Adam { moments } => {
                moments.validate()?;
                self.moments = moments.clone();
                Ok(())
            }
            other => Err(UpdateRuleState::wrong_kind("adam", other)),
        }
    }

    fn rollback_point(&self) -> RollbackPoint {
        RollbackPoint::Moments {
            calls: self.moments.calls(),
        }
    }

    fn rollback(&mut self, point: RollbackPoint) -> Result<(), GradlessError> {
        match point {
            RollbackPoint::Moments { calls } => self.moments.truncate(calls),
            other => Err(RollbackPoint::wrong_kind("adam", &other)),
        }
    }
}

#[cfg(test)]
#[path = "adam_test.rs"]
mod tests;
