//! Gradient-free stochastic approximation.
//!
//! `SpsaOptimizer` minimises a scalar objective using only cost evaluations:
//! the gradient is estimated by simultaneous perturbation, turned into a step
//! by a pluggable update rule, and every candidate is screened before it is
//! committed.

pub mod acceptance;
pub mod error;
pub mod gradient;
pub mod objective;
pub mod optim;
pub mod update;

pub use error::GradlessError;

// Re-export the types most callers need directly from the crate root.
pub use acceptance::{AcceptanceRule, MetropolisAcceptance, ToleranceAcceptance};
pub use gradient::{GradientEstimator, SpsaGradient, SubsetAssignment};
pub use objective::{shared, FnObjective, Objective, SharedObjective, StochasticObjective};
pub use optim::{
    FitReport, MomentPolicy, Optimizer, OptimizerConfig, OptimizerState, RejectionReason, SpsaOptimizer,
    StepOutcome,
};
pub use update::{Adagrad, Adam, Nadam, PlainUpdate, UpdateRule, UpdateRuleState};
