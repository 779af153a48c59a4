use gradless_core::{shared, FnObjective, SharedObjective};
use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

// Initializes env_logger once per test binary; later calls are no-ops.
#[allow(dead_code)]
pub fn setup_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// `f(theta) = sum(theta_i^2)`, minimum 0 at the origin.
#[allow(dead_code)]
pub fn sphere() -> SharedObjective {
    shared(FnObjective::new(|theta: &[f64]| theta.iter().map(|x| x * x).sum()))
}

#[allow(dead_code)]
pub fn sphere_cost(theta: &[f64]) -> f64 {
    theta.iter().map(|x| x * x).sum()
}
