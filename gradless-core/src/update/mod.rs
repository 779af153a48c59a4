//! Update rules turning a gradient estimate into a parameter delta.
//!
//! This module provides the `UpdateRule` trait, the `UpdateRuleState`
//! snapshot used for checkpointing, and the plain, ADAGRAD, ADAM and NADAM
//! rules.

pub mod adagrad;
pub mod adam;
pub mod nadam;
pub mod plain;
pub mod update_state;
pub mod update_trait;

pub use adagrad::Adagrad;
pub use adam::Adam;
pub use nadam::Nadam;
pub use plain::PlainUpdate;
pub use update_state::{MomentHistory, RollbackPoint, UpdateRuleState};
pub use update_trait::UpdateRule;

use crate::error::GradlessError;

pub(crate) fn check_betas(rule: &str, beta1: f64, beta2: f64, eps: f64) -> Result<(), GradlessError> {
    if !(0.0..1.0).contains(&beta1) {
        return Err(GradlessError::ConfigurationError(format!(
            "{}: beta1 must be in [0, 1), got {}",
            rule, beta1
        )));
    }
    if !(0.0..1.0).contains(&beta2) {
        return Err(GradlessError::ConfigurationError(format!(
            "{}: beta2 must be in [0, 1), got {}",
            rule, beta2
        )));
    }
    if !(eps.is_finite() && eps > 0.0) {
        return Err(GradlessError::ConfigurationError(format!(
            "{}: epsilon must be positive, got {}",
            rule, eps
        )));
    }
    Ok(())
}

pub(crate) fn check_iteration(rule: &str, t: f64) -> Result<(), GradlessError> {
    if !(t.is_finite() && t > 0.0) {
        return Err(GradlessError::ConfigurationError(format!(
            "{}: bias correction requires t > 0, got {}",
            rule, t
        )));
    }
    Ok(())
}
