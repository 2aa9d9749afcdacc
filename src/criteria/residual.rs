//! Residual-norm stop criterion.
//!
//! Declares convergence once ‖r‖ ≤ max(atol, rtol · ‖b‖). The baseline ‖b‖ is recorded on
//! the first evaluation; when the right-hand side is zero the first residual norm is used
//! instead so the relative bound stays meaningful. A non-finite ‖b‖ is a `Failure`.

use crate::config::options::{check_positive, check_tolerances};
use crate::core::traits::{Scalar, Vector};
use crate::error::KError;
use crate::utils::convergence::{CalculationStatus, IterationSnapshot, Verdict};
use num_traits::Float;

#[derive(Clone, Debug)]
pub struct ResidualNormCriterion<R> {
    relative_tolerance: R,
    absolute_tolerance: R,
    minimum_iterations_below: usize,
    baseline: Option<R>,
    iterations_below: usize,
    status: CalculationStatus,
}

impl<R: Float> ResidualNormCriterion<R> {
    pub fn new(relative_tolerance: R, absolute_tolerance: R) -> Result<Self, KError> {
        check_tolerances(relative_tolerance, absolute_tolerance)?;
        Ok(Self {
            relative_tolerance,
            absolute_tolerance,
            minimum_iterations_below: 1,
            baseline: None,
            iterations_below: 0,
            status: CalculationStatus::Running,
        })
    }

    /// Require the residual to stay below the bound for `n` consecutive evaluations.
    pub fn with_minimum_iterations_below(mut self, n: usize) -> Result<Self, KError> {
        check_positive("minimum_iterations_below", n)?;
        self.minimum_iterations_below = n;
        Ok(self)
    }

    pub fn relative_tolerance(&self) -> R {
        self.relative_tolerance
    }
    pub fn absolute_tolerance(&self) -> R {
        self.absolute_tolerance
    }
    pub fn minimum_iterations_below(&self) -> usize {
        self.minimum_iterations_below
    }
    /// Baseline norm r0, once recorded.
    pub fn baseline(&self) -> Option<R> {
        self.baseline
    }
    pub fn status(&self) -> CalculationStatus {
        self.status
    }

    pub fn evaluate<V>(&mut self, snapshot: &IterationSnapshot<'_, V>) -> Verdict<R>
    where
        V: Vector,
        V::Scalar: Scalar<Real = R>,
    {
        let r = snapshot.residual_norm();
        if !r.is_finite() {
            self.status = CalculationStatus::Failure;
            return Verdict::with_norm(self.status, r);
        }

        let r0 = match self.baseline {
            Some(r0) => r0,
            None => {
                let b = snapshot.source.norm();
                if !b.is_finite() {
                    self.status = CalculationStatus::Failure;
                    return Verdict::with_norm(self.status, r);
                }
                *self.baseline.insert(if b > R::zero() { b } else { r })
            }
        };
        let bound = self.absolute_tolerance.max(self.relative_tolerance * r0);

        if r <= bound {
            self.iterations_below += 1;
        } else {
            self.iterations_below = 0;
        }
        self.status = if self.iterations_below >= self.minimum_iterations_below {
            CalculationStatus::Converged
        } else {
            CalculationStatus::Running
        };
        Verdict::with_norm(self.status, r)
    }

    pub fn reset(&mut self) {
        self.baseline = None;
        self.iterations_below = 0;
        self.status = CalculationStatus::Running;
    }

    pub fn cancel(&mut self) {
        self.status = CalculationStatus::Cancelled;
    }
}
