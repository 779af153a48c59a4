use log::warn;

use super::acceptance_trait::{AcceptanceRule, OptimizerContext};
use crate::error::GradlessError;

/// Accepts a candidate unless it exceeds the last committed cost by more
/// than a decaying tolerance `tol_0 / t^decay`.
///
/// `tol_0` is either given explicitly or derived at initialization as
/// `fraction * |initial cost|`.
#[derive(Debug, Clone)]
pub struct ToleranceAcceptance {
    fraction: f64,
    explicit_tolerance: Option<f64>,
    decay: f64,
    initial_tolerance: Option<f64>,
    last_cost: Option<f64>,
}

impl ToleranceAcceptance {
    /// Tolerance proportional to the starting cost.
    pub fn relative(fraction: f64, decay: f64) -> Result<Self, GradlessError> {
        Self::check("fraction", fraction)?;
        Self::check("decay", decay)?;
        Ok(ToleranceAcceptance {
            fraction,
            explicit_tolerance: None,
            decay,
            initial_tolerance: None,
            last_cost: None,
        })
    }

    /// Tolerance starting at `tolerance`.
    pub fn absolute(tolerance: f64, decay: f64) -> Result<Self, GradlessError> {
        Self::check("tolerance", tolerance)?;
        Self::check("decay", decay)?;
        Ok(ToleranceAcceptance {
            fraction: 0.0,
            explicit_tolerance: Some(tolerance),
            decay,
            initial_tolerance: None,
            last_cost: None,
        })
    }

    /// Tolerance in force at iteration `t`, once initialized.
    pub fn tolerance_at(&self, t: f64) -> Option<f64> {
        self.initial_tolerance
            .map(|tol_0| tol_0 / t.max(1.0).powf(self.decay))
    }

    fn check(name: &str, value: f64) -> Result<(), GradlessError> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(GradlessError::ConfigurationError(format!(
                "ToleranceAcceptance: {} must be finite and non-negative, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

impl AcceptanceRule for ToleranceAcceptance {
    fn initialize(&mut self, context: &OptimizerContext<'_>) -> Result<(), GradlessError> {
        let initial_cost = context
            .last_cost()
            .filter(|cost| cost.is_finite())
            .ok_or_else(|| {
                GradlessError::ConfigurationError(
                    "ToleranceAcceptance requires a finite starting cost".to_string(),
                )
            })?;
        self.initial_tolerance = Some(
            self.explicit_tolerance
                .unwrap_or(self.fraction * initial_cost.abs()),
        );
        self.last_cost = Some(initial_cost);
        Ok(())
    }

    fn evaluate(&mut self, candidate_cost: f64, t: f64) -> bool {
        match (self.last_cost, self.tolerance_at(t)) {
            (Some(last), Some(tolerance)) => candidate_cost <= last + tolerance,
            _ => {
                warn!("ToleranceAcceptance: evaluate called before initialize, rejecting");
                false
            }
        }
    }

    fn on_commit(&mut self, cost: f64, _t: f64) {
        self.last_cost = Some(cost);
    }
}
