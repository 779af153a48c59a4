// examples/noisy_objective.rs
//!
//! Fits the mean of a noisy quadratic whose random variables are redrawn
//! before every gradient estimate, with parameters split into two subsets and
//! a tolerance acceptance rule screening candidates.

use gradless_core::{
    acceptance::ToleranceAcceptance,
    error::GradlessError,
    gradient::{SpsaGradient, SubsetAssignment},
    objective::{shared, StochasticObjective},
    optim::{optimizer_trait::Optimizer, OptimizerConfig, SpsaOptimizer, StepOutcome},
    update::Adam,
};
use rand_distr::Normal;

fn main() -> Result<(), GradlessError> {
    let _ = env_logger::builder().try_init();

    let noise = Normal::new(2.0, 0.5)
        .map_err(|e| GradlessError::ConfigurationError(format!("invalid noise distribution: {}", e)))?;
    let objective = shared(StochasticObjective::new(
        |theta: &[f64], z: &[f64]| theta.iter().zip(z).map(|(t, z)| (t - z) * (t - z)).sum(),
        noise,
        4,
        Some(11),
    ));

    let subsets = SubsetAssignment::new(vec!["first", "first", "second", "second"])?;
    let config = OptimizerConfig::default()
        .with_param_step(0.2, 0.602)
        .with_grad_step(0.2, 0.101)
        .with_decay_offset(10.0)
        .with_gradient_reps(3)
        .with_resample(true)
        .with_seed(11);

    let mut optimizer = SpsaOptimizer::with_components(
        vec![0.0; 4],
        objective,
        Box::new(Adam::default()),
        Some(Box::new(SpsaGradient::with_subsets(subsets))),
        Some(Box::new(ToleranceAcceptance::relative(0.5, 0.5)?)),
        config,
    )?;

    let mut rejected = 0;
    for _ in 0..2_000 {
        if let StepOutcome::Rejected(reason) = optimizer.step()? {
            rejected += 1;
            log::debug!("rejected at t = {}: {:?}", optimizer.t(), reason);
        }
    }
    println!(
        "theta = {:?} (expected near 2.0), {} committed, {} rejected",
        optimizer.theta(),
        optimizer.t(),
        rejected
    );
    Ok(())
}
