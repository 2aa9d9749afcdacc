//! Target-value stop criterion.
//!
//! Convergence is decided by a caller-supplied acceptance test on `(solution, source)`,
//! e.g. an application-specific accuracy check. The predicate is configuration and
//! survives `reset`.

use crate::core::traits::Vector;
use crate::utils::convergence::{CalculationStatus, IterationSnapshot, Verdict};
use std::fmt;

type Predicate<V> = Box<dyn FnMut(&V, &V) -> bool + Send>;

pub struct TargetValueCriterion<V> {
    predicate: Predicate<V>,
    status: CalculationStatus,
}

impl<V: Vector> TargetValueCriterion<V> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: FnMut(&V, &V) -> bool + Send + 'static,
    {
        Self { predicate: Box::new(predicate), status: CalculationStatus::Running }
    }

    pub fn status(&self) -> CalculationStatus {
        self.status
    }

    pub fn evaluate<R>(&mut self, snapshot: &IterationSnapshot<'_, V>) -> Verdict<R> {
        self.status = if (self.predicate)(snapshot.solution, snapshot.source) {
            CalculationStatus::Converged
        } else {
            CalculationStatus::Running
        };
        Verdict::new(self.status)
    }

    pub fn reset(&mut self) {
        self.status = CalculationStatus::Running;
    }

    pub fn cancel(&mut self) {
        self.status = CalculationStatus::Cancelled;
    }
}

impl<V> fmt::Debug for TargetValueCriterion<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetValueCriterion")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_decides_convergence() {
        // accept once every entry is within 1e-3 of 2.0
        let mut c = TargetValueCriterion::new(|x: &Vec<f64>, _b: &Vec<f64>| {
            x.iter().all(|v| (v - 2.0).abs() < 1e-3)
        });
        let b = vec![4.0, 4.0];
        let r = vec![0.0, 0.0];
        let far = vec![1.0, 2.0];
        let near = vec![2.0001, 1.9999];
        assert_eq!(
            c.evaluate::<f64>(&IterationSnapshot::new(0, &far, &b, &r)).status,
            CalculationStatus::Running
        );
        assert_eq!(
            c.evaluate::<f64>(&IterationSnapshot::new(1, &near, &b, &r)).status,
            CalculationStatus::Converged
        );
        c.reset();
        assert_eq!(c.status(), CalculationStatus::Running);
        assert_eq!(
            c.evaluate::<f64>(&IterationSnapshot::new(0, &near, &b, &r)).status,
            CalculationStatus::Converged
        );
    }
}
