//! The SPSA optimization loop.
//!
//! This module provides the `Optimizer` trait, the configuration and
//! step-size schedules, the outlier guard, checkpoints, and `SpsaOptimizer`,
//! which ties a gradient estimator, an update rule and an optional acceptance
//! rule together.

pub mod config;
pub mod guards;
pub mod optimizer_state;
pub mod optimizer_trait;
pub mod outcome;
pub mod schedule;
pub mod spsa_optimizer;

pub use config::{MomentPolicy, OptimizerConfig};
pub use optimizer_state::OptimizerState;
pub use optimizer_trait::Optimizer;
pub use outcome::{FitReport, RejectionReason, StepOutcome};
pub use schedule::DecaySchedule;
pub use spsa_optimizer::SpsaOptimizer;
