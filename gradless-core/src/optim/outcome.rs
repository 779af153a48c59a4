/// Why a candidate step was not committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionReason {
    /// The objective returned NaN at the candidate.
    NotANumber,
    /// The acceptance rule vetoed the candidate.
    Vetoed,
    /// The candidate cost exceeded the outlier guard's limit.
    Outlier { limit: f64 },
}

/// Result of one call to `step()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Accepted { cost: f64 },
    Rejected(RejectionReason),
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted { .. })
    }
}

/// Tally of a multi-step run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FitReport {
    pub attempted: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl FitReport {
    pub(crate) fn record(&mut self, outcome: &StepOutcome) {
        self.attempted += 1;
        if outcome.is_accepted() {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }
}
