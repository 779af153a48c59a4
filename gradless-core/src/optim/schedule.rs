use crate::error::GradlessError;

/// A decaying step-size schedule `stepsize / (t + offset)^decay`.
///
/// Values are recomputed from `t` on every call and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DecaySchedule {
    name: &'static str,
    stepsize: f64,
    decay: f64,
    offset: f64,
}

impl DecaySchedule {
    pub fn new(name: &'static str, stepsize: f64, decay: f64, offset: f64) -> Self {
        DecaySchedule {
            name,
            stepsize,
            decay,
            offset,
        }
    }

    /// The step size at iteration `t`.
    ///
    /// # Errors
    ///
    /// Returns `GradlessError::InvalidStepSize` when the value is not finite
    /// and positive, e.g. a zero base with a positive decay or a negative base
    /// with a fractional one.
    pub fn at(&self, t: f64) -> Result<f64, GradlessError> {
        let base = t + self.offset;
        let value = self.stepsize / base.powf(self.decay);
        if !(value.is_finite() && value > 0.0) {
            return Err(GradlessError::InvalidStepSize {
                schedule: self.name.to_string(),
                t,
                value,
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_schedule_decays() {
        let schedule = DecaySchedule::new("a", 0.1, 0.4, 0.0);
        assert_relative_eq!(schedule.at(1.0).unwrap(), 0.1);
        assert_relative_eq!(schedule.at(32.0).unwrap(), 0.1 / 4.0, max_relative = 1e-12);
        assert!(schedule.at(10.0).unwrap() < schedule.at(9.0).unwrap());
    }

    #[test]
    fn test_schedule_offset_shifts_base() {
        let schedule = DecaySchedule::new("a", 1.0, 1.0, 9.0);
        assert_relative_eq!(schedule.at(1.0).unwrap(), 0.1);
    }

    #[test]
    fn test_zero_decay_is_constant() {
        let schedule = DecaySchedule::new("c", 0.5, 0.0, 0.0);
        assert_eq!(schedule.at(1.0).unwrap(), 0.5);
        assert_eq!(schedule.at(1000.0).unwrap(), 0.5);
    }

    #[test]
    fn test_degenerate_bases_are_errors() {
        let schedule = DecaySchedule::new("c", 1.0, 0.2, 0.0);
        assert!(matches!(schedule.at(0.0), Err(GradlessError::InvalidStepSize { .. })));
        let negative = DecaySchedule::new("a", 1.0, 0.5, -3.0);
        assert!(matches!(negative.at(1.0), Err(GradlessError::InvalidStepSize { .. })));
    }
}
