// Iteration budget stop criterion

use crate::config::options::check_positive;
use crate::error::KError;
use crate::utils::convergence::{CalculationStatus, Verdict};

/// Stops with `Diverged` once `iteration >= max_iterations`.
#[derive(Clone, Debug)]
pub struct IterationCountCriterion {
    max_iterations: usize,
    status: CalculationStatus,
}

impl IterationCountCriterion {
    pub fn new(max_iterations: usize) -> Result<Self, KError> {
        check_positive("max_iterations", max_iterations)?;
        Ok(Self { max_iterations, status: CalculationStatus::Running })
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
    pub fn status(&self) -> CalculationStatus {
        self.status
    }

    pub fn evaluate<R>(&mut self, iteration: usize) -> Verdict<R> {
        self.status = if iteration >= self.max_iterations {
            CalculationStatus::Diverged
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
