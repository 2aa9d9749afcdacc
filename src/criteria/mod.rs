//! Stop criteria for iterative solvers.
//!
//! Each criterion inspects one [`IterationSnapshot`] and answers with a [`Verdict`]. The set of
//! criteria is closed: [`StopCriterion`] is a tagged enum over every supported rule, and the
//! controller resolves their verdicts in one place.
//!
//! Every criterion keeps the status of its last verdict for diagnostics. `reset` clears
//! tracking state (baselines, histories, clocks) but never configuration; `cancel` only marks
//! the criterion as cancelled and keeps its history.

use crate::core::traits::{Real, Vector};
use crate::utils::convergence::{CalculationStatus, IterationSnapshot, Verdict};

pub mod divergence;
pub mod failure;
pub mod iteration_count;
pub mod residual;
pub mod target_value;
pub mod timeout;

pub use divergence::DivergenceCriterion;
pub use failure::NumericFailureCriterion;
pub use iteration_count::IterationCountCriterion;
pub use residual::ResidualNormCriterion;
pub use target_value::TargetValueCriterion;
pub use timeout::TimeoutCriterion;

/// A single stop rule.
#[derive(Debug)]
pub enum StopCriterion<V: Vector> {
    /// ‖r‖ ≤ max(atol, rtol · ‖b‖)
    ResidualNorm(ResidualNormCriterion<Real<V>>),
    /// Sustained growth of ‖r‖ over a bounded window
    Divergence(DivergenceCriterion<Real<V>>),
    /// Iteration budget
    IterationCount(IterationCountCriterion),
    /// Caller-supplied acceptance test on the solution
    TargetValue(TargetValueCriterion<V>),
    /// NaN/Inf in the solution or residual
    NumericFailure(NumericFailureCriterion),
    /// Wall-clock budget
    Timeout(TimeoutCriterion),
}

impl<V: Vector> StopCriterion<V> {
    /// Short, stable name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            StopCriterion::ResidualNorm(_) => "residual-norm",
            StopCriterion::Divergence(_) => "divergence",
            StopCriterion::IterationCount(_) => "iteration-count",
            StopCriterion::TargetValue(_) => "target-value",
            StopCriterion::NumericFailure(_) => "numeric-failure",
            StopCriterion::Timeout(_) => "timeout",
        }
    }

    pub fn evaluate(&mut self, snapshot: &IterationSnapshot<'_, V>) -> Verdict<Real<V>> {
        match self {
            StopCriterion::ResidualNorm(c) => c.evaluate(snapshot),
            StopCriterion::Divergence(c) => c.evaluate(snapshot),
            StopCriterion::IterationCount(c) => c.evaluate(snapshot.iteration),
            StopCriterion::TargetValue(c) => c.evaluate(snapshot),
            StopCriterion::NumericFailure(c) => c.evaluate(snapshot),
            StopCriterion::Timeout(c) => c.evaluate(),
        }
    }

    /// Status of this criterion's last verdict.
    pub fn status(&self) -> CalculationStatus {
        match self {
            StopCriterion::ResidualNorm(c) => c.status(),
            StopCriterion::Divergence(c) => c.status(),
            StopCriterion::IterationCount(c) => c.status(),
            StopCriterion::TargetValue(c) => c.status(),
            StopCriterion::NumericFailure(c) => c.status(),
            StopCriterion::Timeout(c) => c.status(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            StopCriterion::ResidualNorm(c) => c.reset(),
            StopCriterion::Divergence(c) => c.reset(),
            StopCriterion::IterationCount(c) => c.reset(),
            StopCriterion::TargetValue(c) => c.reset(),
            StopCriterion::NumericFailure(c) => c.reset(),
            StopCriterion::Timeout(c) => c.reset(),
        }
    }

    pub fn cancel(&mut self) {
        match self {
            StopCriterion::ResidualNorm(c) => c.cancel(),
            StopCriterion::Divergence(c) => c.cancel(),
            StopCriterion::IterationCount(c) => c.cancel(),
            StopCriterion::TargetValue(c) => c.cancel(),
            StopCriterion::NumericFailure(c) => c.cancel(),
            StopCriterion::Timeout(c) => c.cancel(),
        }
    }
}

impl<V: Vector> From<ResidualNormCriterion<Real<V>>> for StopCriterion<V> {
    fn from(c: ResidualNormCriterion<Real<V>>) -> Self {
        StopCriterion::ResidualNorm(c)
    }
}

impl<V: Vector> From<DivergenceCriterion<Real<V>>> for StopCriterion<V> {
    fn from(c: DivergenceCriterion<Real<V>>) -> Self {
        StopCriterion::Divergence(c)
    }
}

impl<V: Vector> From<IterationCountCriterion> for StopCriterion<V> {
    fn from(c: IterationCountCriterion) -> Self {
        StopCriterion::IterationCount(c)
    }
}

impl<V: Vector> From<TargetValueCriterion<V>> for StopCriterion<V> {
    fn from(c: TargetValueCriterion<V>) -> Self {
        StopCriterion::TargetValue(c)
    }
}

impl<V: Vector> From<NumericFailureCriterion> for StopCriterion<V> {
    fn from(c: NumericFailureCriterion) -> Self {
        StopCriterion::NumericFailure(c)
    }
}

impl<V: Vector> From<TimeoutCriterion> for StopCriterion<V> {
    fn from(c: TimeoutCriterion) -> Self {
        StopCriterion::Timeout(c)
    }
}
