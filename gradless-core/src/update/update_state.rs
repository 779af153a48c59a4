use crate::error::GradlessError;

/// First and second moment histories of the ADAM family.
///
/// Both sequences start with one seed entry standing for time 0; each update
/// appends exactly one entry to each, so `m.len() == v.len() == calls + 1`.
/// The seed entry is stored empty and reads as a zero vector of whatever
/// length the first gradient has.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MomentHistory {
    pub m: Vec<Vec<f64>>,
    pub v: Vec<Vec<f64>>,
}

impl MomentHistory {
    pub fn new() -> Self {
        MomentHistory {
            m: vec![Vec::new()],
            v: vec![Vec::new()],
        }
    }

    /// Number of updates recorded (excluding the seed entry).
    pub fn calls(&self) -> usize {
        self.m.len().saturating_sub(1)
    }

    /// Appends `m_t = b1 m_{t-1} + (1 - b1) g` and `v_t = b2 v_{t-1} + (1 - b2) g^2`.
    pub(crate) fn push(&mut self, ghat: &[f64], beta1: f64, beta2: f64) -> Result<(), GradlessError> {
        let m_prev = self.m.last().map(Vec::as_slice).unwrap_or(&[]);
        let v_prev = self.v.last().map(Vec::as_slice).unwrap_or(&[]);
        for prev in [m_prev, v_prev] {
            if !prev.is_empty() && prev.len() != ghat.len() {
                return Err(GradlessError::ShapeMismatch {
                    expected: prev.len(),
                    actual: ghat.len(),
                    operation: "moment history update".to_string(),
                });
            }
        }

        let m_t: Vec<f64> = ghat
            .iter()
            .enumerate()
            .map(|(i, g)| beta1 * m_prev.get(i).copied().unwrap_or(0.0) + (1.0 - beta1) * g)
            .collect();
        let v_t: Vec<f64> = ghat
            .iter()
            .enumerate()
            .map(|(i, g)| beta2 * v_prev.get(i).copied().unwrap_or(0.0) + (1.0 - beta2) * g * g)
            .collect();
        self.m.push(m_t);
        self.v.push(v_t);
        Ok(())
    }

    pub(crate) fn latest(&self) -> (&[f64], &[f64]) {
        (
            self.m.last().map(Vec::as_slice).unwrap_or(&[]),
            self.v.last().map(Vec::as_slice).unwrap_or(&[]),
        )
    }

    pub(crate) fn validate(&self) -> Result<(), GradlessError> {
        if self.m.is_empty() || self.m.len() != self.v.len() {
            return Err(GradlessError::StateError(format!(
                "moment histories must be non-empty and of equal length, got m: {}, v: {}",
                self.m.len(),
                self.v.len()
            )));
        }
        Ok(())
    }

    /// Checks that every recorded moment has `n_params` entries.
    ///
    /// The seed entry may also be empty.
    pub(crate) fn check_len(&self, n_params: usize) -> Result<(), GradlessError> {
        self.validate()?;
        for (i, (m, v)) in self.m.iter().zip(&self.v).enumerate() {
            for moment in [m, v] {
                let seed_placeholder = i == 0 && moment.is_empty();
                if !seed_placeholder && moment.len() != n_params {
                    return Err(GradlessError::ShapeMismatch {
                        expected: n_params,
                        actual: moment.len(),
                        operation: format!("moment history entry {}", i),
                    });
                }
            }
        }
        Ok(())
    }

    /// Drops every entry recorded after the first `calls` updates.
    pub(crate) fn truncate(&mut self, calls: usize) -> Result<(), GradlessError> {
        if calls > self.calls() {
            return Err(GradlessError::StateError(format!(
                "cannot roll moment history back to {} calls, only {} recorded",
                calls,
                self.calls()
            )));
        }
        self.m.truncate(calls + 1);
        self.v.truncate(calls + 1);
        Ok(())
    }
}

impl Default for MomentHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the internal state of an update rule.
///
/// Returned by `UpdateRule::state_dict` and accepted back by
/// `UpdateRule::load_state_dict`; it is plain data so callers can persist it
/// alongside the optimizer's own state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateRuleState {
    /// The plain rule is stateless.
    Plain,
    /// Cumulative squared gradients, `None` until the first call.
    Adagrad { accumulator: Option<Vec<f64>> },
    Adam { moments: MomentHistory },
    Nadam { moments: MomentHistory },
}

impl UpdateRuleState {
    pub fn kind(&self) -> &'static str {
        match self {
            UpdateRuleState::Plain => "plain",
            UpdateRuleState::Adagrad { .. } => "adagrad",
            UpdateRuleState::Adam { .. } => "adam",
            UpdateRuleState::Nadam { .. } => "nadam",
        }
    }

    /// Checks that the accumulated state fits a parameter vector of length `n_params`.
    pub fn check_len(&self, n_params: usize) -> Result<(), GradlessError> {
        match self {
            UpdateRuleState::Plain => Ok(()),
            UpdateRuleState::Adagrad { accumulator: None } => Ok(()),
            UpdateRuleState::Adagrad {
                accumulator: Some(accumulator),
            } => {
                if accumulator.len() != n_params {
                    return Err(GradlessError::ShapeMismatch {
                        expected: n_params,
                        actual: accumulator.len(),
                        operation: "Adagrad accumulator".to_string(),
                    });
                }
                Ok(())
            }
            UpdateRuleState::Adam { moments } | UpdateRuleState::Nadam { moments } => moments.check_len(n_params),
        }
    }

    pub(crate) fn wrong_kind(expected: &str, actual: &UpdateRuleState) -> GradlessError {
        GradlessError::StateError(format!(
            "expected {} state, got {} state",
            expected,
            actual.kind()
        ))
    }
}

/// What an update rule needs to undo the calls made after it was recorded.
///
/// Moment histories only ever grow, so the ADAM family records a call count
/// instead of a copy.
#[derive(Debug, Clone, PartialEq)]
pub enum RollbackPoint {
    Plain,
    Adagrad { accumulator: Option<Vec<f64>> },
    Moments { calls: usize },
    /// A full snapshot, for rules without a cheaper form.
    Full(UpdateRuleState),
}

impl RollbackPoint {
    pub fn kind(&self) -> &'static str {
        match self {
            RollbackPoint::Plain => "plain",
            RollbackPoint::Adagrad { .. } => "adagrad",
            RollbackPoint::Moments { .. } => "moments",
            RollbackPoint::Full(_) => "full",
        }
    }

    pub(crate) fn wrong_kind(expected: &str, actual: &RollbackPoint) -> GradlessError {
        GradlessError::StateError(format!(
            "expected {} rollback point, got {} rollback point",
            expected,
            actual.kind()
        ))
    }
}
