//! Pluggable acceptance rules that may veto a candidate step.

pub mod acceptance_trait;
pub mod metropolis;
pub mod tolerance;

pub use acceptance_trait::{AcceptanceRule, OptimizerContext};
pub use metropolis::MetropolisAcceptance;
pub use tolerance::ToleranceAcceptance;

#[cfg(test)]
#[path = "acceptance_test.rs"]
mod tests;
