use super::*;
use approx::assert_relative_eq;

#[test]
fn test_adam_new_validates_hyperparameters() {
    assert!(Adam::new(0.9, 0.999, 1e-8).is_ok());
    assert!(matches!(Adam::new(1.0, 0.999, 1e-8), Err(GradlessError::ConfigurationError(_))));
    assert!(matches!(Adam::new(0.9, -0.1, 1e-8), Err(GradlessError::ConfigurationError(_))));
    assert!(matches!(Adam::new(0.9, 0.999, 0.0), Err(GradlessError::ConfigurationError(_))));
}

#[test]
fn test_adam_bias_correction_at_first_iteration() {
    // With m_0 = v_0 = 0, m_hat = ghat and v_hat = ghat^2 at t = 1.
    let ghat = [0.5, -2.0, 4.0];
    let step_size = 0.3;
    let mut rule = Adam::default();
    let delta = rule.evaluate(&ghat, step_size, 1.0).unwrap();

    for (d, g) in delta.iter().zip(ghat.iter()) {
        let expected = step_size * g / ((g * g).sqrt() + 1e-8);
        assert_relative_eq!(*d, expected, max_relative = 1e-9);
    }
    let (m_1, v_1) = (&rule.moments().m[1], &rule.moments().v[1]);
    for ((m, v), g) in m_1.iter().zip(v_1.iter()).zip(ghat.iter()) {
        assert_relative_eq!(m / (1.0 - 0.9), *g, max_relative = 1e-12);
        assert_relative_eq!(v / (1.0 - 0.999), g * g, max_relative = 1e-9);
    }
}

#[test]
fn test_adam_history_grows_one_entry_per_call() {
    let mut rule = Adam::default();
    assert_eq!(rule.moments().m.len(), 1);
    for t in 1..=4 {
        rule.evaluate(&[1.0, 2.0], 0.1, t as f64).unwrap();
        assert_eq!(rule.moments().m.len(), t + 1);
        assert_eq!(rule.moments().v.len(), t + 1);
    }
    assert_eq!(rule.moments().calls(), 4);
}

#[test]
fn test_adam_second_iteration_matches_recurrence() {
    let (beta1, beta2, eps) = (0.8, 0.9, 1e-8);
    let mut rule = Adam::new(beta1, beta2, eps).unwrap();
    rule.evaluate(&[1.0], 1.0, 1.0).unwrap();
    let delta = rule.evaluate(&[3.0], 1.0, 2.0).unwrap();

    let m2 = beta1 * (1.0 - beta1) * 1.0 + (1.0 - beta1) * 3.0;
    let v2 = beta2 * (1.0 - beta2) * 1.0 + (1.0 - beta2) * 9.0;
    let m_hat = m2 / (1.0 - beta1 * beta1);
    let v_hat = v2 / (1.0 - beta2 * beta2);
    assert_relative_eq!(delta[0], m_hat / (v_hat.sqrt() + eps), max_relative = 1e-9);
}

#[test]
fn test_adam_rejects_zero_iteration_without_touching_state() {
    let mut rule = Adam::default();
    let result = rule.evaluate(&[1.0], 0.1, 0.0);
    assert!(matches!(result, Err(GradlessError::ConfigurationError(_))));
    assert_eq!(rule.moments().calls(), 0);
}

#[test]
fn test_adam_load_state_rejects_malformed_history() {
    let mut rule = Adam::default();
    let malformed = UpdateRuleState::Adam {
        moments: MomentHistory {
            m: vec![Vec::new(), vec![1.0]],
            v: vec![Vec::new()],
        },
    };
    assert!(matches!(rule.load_state_dict(&malformed), Err(GradlessError::StateError(_))));
    let foreign = UpdateRuleState::Nadam { moments: MomentHistory::new() };
    assert!(matches!(rule.load_state_dict(&foreign), Err(GradlessError::StateError(_))));
}

#[test]
fn test_adam_rollback_drops_later_moments() {
    let mut rule = Adam::default();
    rule.evaluate(&[1.0, 2.0], 0.1, 1.0).unwrap();
    let point = rule.rollback_point();
    let kept = rule.moments().clone();

    rule.evaluate(&[3.0, 4.0], 0.1, 2.0).unwrap();
    rule.evaluate(&[5.0, 6.0], 0.1, 3.0).unwrap();
    rule.rollback(point).unwrap();
    assert_eq!(rule.moments(), &kept);
    assert_eq!(rule.moments().m.len(), 2);

    // A point ahead of the current history cannot be honoured.
    let ahead = RollbackPoint::Moments { calls: 5 };
    assert!(matches!(rule.rollback(ahead), Err(GradlessError::StateError(_))));
    assert!(matches!(rule.rollback(RollbackPoint::Plain), Err(GradlessError::StateError(_))));
}

#[test]
fn test_moment_state_length_check() {
    let mut rule = Adam::default();
    rule.evaluate(&[1.0, 2.0], 0.1, 1.0).unwrap();
    let state = rule.state_dict();
    assert!(state.check_len(2).is_ok());
    assert!(matches!(
        state.check_len(3),
        Err(GradlessError::ShapeMismatch { expected: 3, actual: 2, .. })
    ));
    assert!(UpdateRuleState::Adam { moments: MomentHistory::new() }.check_len(7).is_ok());
}
