// Numeric failure stop criterion: NaN/Inf in the solution, right-hand side or residual

use crate::core::traits::{Real, Vector};
use crate::utils::convergence::{CalculationStatus, IterationSnapshot, Verdict};
use num_traits::Float;

/// Reports `Failure` as soon as the solution, the right-hand side or the residual holds a
/// non-finite value.
#[derive(Clone, Debug, Default)]
pub struct NumericFailureCriterion {
    status: CalculationStatus,
}

impl NumericFailureCriterion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CalculationStatus {
        self.status
    }

    pub fn evaluate<V: Vector>(&mut self, snapshot: &IterationSnapshot<'_, V>) -> Verdict<Real<V>> {
        // the cached norm also catches overflow of an otherwise finite residual
        let r = snapshot.residual_norm();
        let finite =
            r.is_finite() && snapshot.solution.is_finite() && snapshot.source.is_finite();
        self.status = if finite {
            CalculationStatus::Running
        } else {
            CalculationStatus::Failure
        };
        Verdict::with_norm(self.status, r)
    }

    pub fn reset(&mut self) {
        self.status = CalculationStatus::Running;
    }

    pub fn cancel(&mut self) {
        self.status = CalculationStatus::Cancelled;
    }
}
