//! The outlier ("block") guard.
//!
//! Until `OUTLIER_WINDOW` steps have been committed, a candidate may not
//! exceed `EARLY_GROWTH_FACTOR` times the last committed cost. Afterwards the
//! limit is `block_val` population standard deviations of the last
//! `OUTLIER_WINDOW` committed costs above the last committed cost.

pub const OUTLIER_WINDOW: usize = 100;
pub const EARLY_GROWTH_FACTOR: f64 = 1.5;

/// Largest admissible candidate cost, or `None` for an empty history.
pub fn outlier_limit(cost_history: &[f64], block_val: f64) -> Option<f64> {
    let last = *cost_history.last()?;
    let committed_steps = cost_history.len() - 1;
    if committed_steps < OUTLIER_WINDOW {
        return Some(EARLY_GROWTH_FACTOR * last);
    }
    let window = &cost_history[cost_history.len() - OUTLIER_WINDOW..];
    Some(block_val * population_std(window) + last)
}

pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_early_limit_is_relative_growth() {
        assert_eq!(outlier_limit(&[10.0], 3.0), Some(15.0));
        let history: Vec<f64> = (0..100).map(|i| 100.0 - i as f64).collect();
        // 99 committed steps: still the early rule.
        assert_eq!(outlier_limit(&history, 3.0), Some(1.5 * 1.0));
        assert_eq!(outlier_limit(&[], 3.0), None);
    }

    #[test]
    fn test_late_limit_uses_window_std() {
        // Initial entry + 100 committed steps alternating 1 and 3.
        let mut history = vec![1000.0];
        history.extend((0..100).map(|i| if i % 2 == 0 { 1.0 } else { 3.0 }));
        let limit = outlier_limit(&history, 2.0).unwrap();
        // Window excludes the initial 1000; std of {1, 3} is 1.
        assert_relative_eq!(limit, 2.0 * 1.0 + 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_population_std() {
        assert_relative_eq!(population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
        assert_eq!(population_std(&[5.0]), 0.0);
    }
}
