use log::{trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::acceptance_trait::{AcceptanceRule, OptimizerContext};
use crate::error::GradlessError;

/// Simulated-annealing acceptance.
///
/// Improvements are always accepted; a worse candidate is accepted with
/// probability `exp(-(candidate - last) / T_t)` where
/// `T_t = T_0 / (1 + t)^decay`. Without an explicit `T_0` the starting
/// temperature is `|initial cost|` (or 1 when that is zero).
#[derive(Debug, Clone)]
pub struct MetropolisAcceptance {
    explicit_temperature: Option<f64>,
    decay: f64,
    initial_temperature: Option<f64>,
    last_cost: Option<f64>,
    rng: StdRng,
}

impl MetropolisAcceptance {
    pub fn new(temperature: Option<f64>, decay: f64, seed: Option<u64>) -> Result<Self, GradlessError> {
        if let Some(temperature) = temperature {
            if !(temperature.is_finite() && temperature > 0.0) {
                return Err(GradlessError::ConfigurationError(format!(
                    "MetropolisAcceptance: temperature must be positive, got {}",
                    temperature
                )));
            }
        }
        if !(decay.is_finite() && decay >= 0.0) {
            return Err(GradlessError::ConfigurationError(format!(
                "MetropolisAcceptance: decay must be non-negative, got {}",
                decay
            )));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(MetropolisAcceptance {
            explicit_temperature: temperature,
            decay,
            initial_temperature: None,
            last_cost: None,
            rng,
        })
    }

    pub fn temperature_at(&self, t: f64) -> Option<f64> {
        self.initial_temperature
            .map(|t_0| t_0 / (1.0 + t).powf(self.decay))
    }
}

impl AcceptanceRule for MetropolisAcceptance {
    fn initialize(&mut self, context: &OptimizerContext<'_>) -> Result<(), GradlessError> {
        let initial_cost = context
            .last_cost()
            .filter(|cost| cost.is_finite())
            .ok_or_else(|| {
                GradlessError::ConfigurationError(
                    "MetropolisAcceptance requires a finite starting cost".to_string(),
                )
            })?;
        let derived = if initial_cost == 0.0 { 1.0 } else { initial_cost.abs() };
        self.initial_temperature = Some(self.explicit_temperature.unwrap_or(derived));
        self.last_cost = Some(initial_cost);
        Ok(())
    }

    fn evaluate(&mut self, candidate_cost: f64, t: f64) -> bool {
        let (last, temperature) = match (self.last_cost, self.temperature_at(t)) {
            (Some(last), Some(temperature)) => (last, temperature),
            _ => {
                warn!("MetropolisAcceptance: evaluate called before initialize, rejecting");
                return false;
            }
        };
        if candidate_cost.is_nan() {
            return false;
        }
        if candidate_cost <= last {
            return true;
        }
        let probability = (-(candidate_cost - last) / temperature).exp();
        let draw: f64 = self.rng.gen();
        trace!(
            "MetropolisAcceptance: uphill move with p = {:.4e}, T = {:.4e}",
            probability,
            temperature
        );
        draw < probability
    }

    fn on_commit(&mut self, cost: f64, _t: f64) {
        self.last_cost = Some(cost);
    }
}
