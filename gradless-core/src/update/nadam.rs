use super::update_state::{MomentHistory, RollbackPoint, UpdateRuleState};
use super::update_trait::UpdateRule;
use super::{check_betas, check_iteration};
use crate::error::GradlessError;

/// NADAM: ADAM with a Nesterov-style lookahead on the first moment.
///
/// Moments follow the ADAM recurrences. The first moment is bias-corrected
/// with exponent `t - 1` and is zero before the second iteration; the step is
///
/// `delta = step_size / (sqrt(v_hat) + eps) * (beta1 * m_hat + (1 - beta1) * ghat / (1 - beta1^t))`
#[derive(Debug, Clone)]
pub struct Nadam {
    beta1: f64,
    beta2: f64,
    eps: f64,
    moments: MomentHistory,
}

impl Nadam {
    pub fn new(beta1: f64, beta2: f64, eps: f64) -> Result<Self, GradlessError> {
        check_betas("Nadam", beta1, beta2, eps)?;
        Ok(Nadam {
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

impl Default for Nadam {
    fn default() -> Self {
        Nadam {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            moments: MomentHistory::new(),
        }
    }
}

impl UpdateRule for Nadam {
    fn evaluate(&mut self, ghat: &[f64], step_size: f64, t: f64) -> Result<Vec<f64>, GradlessError> {
        check_iteration("Nadam", t)?;
        self.moments.push(ghat, self.beta1, self.beta2)?;
        let (m_t, v_t) = self.moments.latest();

        // 1 - beta1^(t-1) vanishes at t = 1.
        let lookahead_correction = if t >= 2.0 {
            Some(1.0 - self.beta1.powf(t - 1.0))
        } else {
            None
        };
        let bias_correction1 = 1.0 - self.beta1.powf(t);
        let bias_correction2 = 1.0 - self.beta2.powf(t);

        Ok(ghat
            .iter()
            .zip(m_t.iter().zip(v_t))
            .map(|(g, (m, v))| {
                let m_hat = lookahead_correction.map_or(0.0, |c| m / c);
                let v_hat = v / bias_correction2;
                let scale = step_size / (v_hat.sqrt() + self.eps);
                scale * (self.beta1 * m_hat + (1.0 - self.beta1) * g / bias_correction1)
            })
            .collect())
    }

    fn state_dict(&self) -> UpdateRuleState {
        UpdateRuleState::Nadam {
            moments: self.moments.clone(),
        }
    }

    fn load_state_dict(&mut self, state: &UpdateRuleState) -> Result<(), GradlessError> {
        match state {
            UpdateRuleState::Nadam { moments } => {
                moments.validate()?;
                self.moments = moments.clone();
                Ok(())
            }
            other => Err(UpdateRuleState::wrong_kind("nadam", other)),
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
            other => Err(RollbackPoint::wrong_kind("nadam", &other)),
        }
    }
}

#[cfg(test)]
#[path = "nadam_test.rs"]
mod tests;
