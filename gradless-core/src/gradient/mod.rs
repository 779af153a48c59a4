//! Gradient estimators.
//!
//! This module provides the `GradientEstimator` trait and the SPSA estimator,
//! which approximates a gradient from two objective evaluations per
//! parameter subset.

pub mod estimator_trait;
pub mod spsa;
pub mod subsets;

pub use estimator_trait::GradientEstimator;
pub use spsa::{draw_perturbation, SpsaGradient};
pub use subsets::SubsetAssignment;
