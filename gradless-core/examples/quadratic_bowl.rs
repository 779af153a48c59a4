// examples/quadratic_bowl.rs
//!
//! Minimises a badly scaled quadratic bowl with each update rule in turn and
//! prints how far each one got. Run with `RUST_LOG=debug` to see every step.

use gradless_core::{
    error::GradlessError,
    objective::{shared, FnObjective},
    optim::{optimizer_trait::Optimizer, OptimizerConfig, SpsaOptimizer},
    update::{Adagrad, Adam, Nadam, PlainUpdate, UpdateRule},
};

fn bowl(theta: &[f64]) -> f64 {
    theta
        .iter()
        .enumerate()
        .map(|(i, x)| (i as f64 + 1.0) * (x - 1.0) * (x - 1.0))
        .sum()
}

fn main() -> Result<(), GradlessError> {
    let _ = env_logger::builder().try_init();

    let rules: Vec<(&str, Box<dyn UpdateRule>, f64)> = vec![
        ("plain", Box::new(PlainUpdate::new()) as Box<dyn UpdateRule>, 0.05),
        ("adagrad", Box::new(Adagrad::new(1e-8)?) as Box<dyn UpdateRule>, 0.5),
        ("adam", Box::new(Adam::new(0.9, 0.999, 1e-8)?) as Box<dyn UpdateRule>, 0.5),
        ("nadam", Box::new(Nadam::default()) as Box<dyn UpdateRule>, 0.5),
    ];

    for (name, rule, param_stepsize) in rules {
        let config = OptimizerConfig::default()
            .with_param_step(param_stepsize, 0.4)
            .with_grad_step(0.1, 0.2)
            .with_block_val(3.0)
            .with_seed(7);
        let mut optimizer = SpsaOptimizer::new(vec![-3.0, 4.0, 0.5, 2.0], shared(FnObjective::new(bowl)), rule, config)?;

        let report = optimizer.fit_until(5_000, |opt| opt.last_cost() < 1e-4)?;
        println!(
            "{:>8}: cost {:.3e} after {} attempts ({} rejected), theta = {:?}",
            name,
            optimizer.last_cost(),
            report.attempted,
            report.rejected,
            optimizer.theta()
        );

        let checkpoint = optimizer.state_dict();
        println!("{:>8}: checkpoint at t = {}", name, checkpoint.t);
    }
    Ok(())
}
