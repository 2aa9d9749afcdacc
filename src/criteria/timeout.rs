// Wall-clock budget stop criterion

use crate::utils::convergence::{CalculationStatus, Verdict};
use std::time::{Duration, Instant};

/// Stops with `Diverged` once more than `budget` has elapsed since the first evaluation
/// after construction or reset.
#[derive(Clone, Debug)]
pub struct TimeoutCriterion {
    budget: Duration,
    started: Option<Instant>,
    status: CalculationStatus,
}

impl TimeoutCriterion {
    pub fn new(budget: Duration) -> Self {
        Self { budget, started: None, status: CalculationStatus::Running }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
    pub fn status(&self) -> CalculationStatus {
        self.status
    }

    /// Time spent since the clock started (zero before the first evaluation).
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn evaluate<R>(&mut self) -> Verdict<R> {
        let started = *self.started.get_or_insert_with(Instant::now);
        self.status = if started.elapsed() > self.budget {
            CalculationStatus::Diverged
        } else {
            CalculationStatus::Running
        };
        Verdict::new(self.status)
    }

    pub fn reset(&mut self) {
        self.started = None;
        self.status = CalculationStatus::Running;
    }

    pub fn cancel(&mut self) {
        self.status = CalculationStatus::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn expires_after_budget() {
        let mut c = TimeoutCriterion::new(Duration::from_millis(20));
        assert_eq!(c.evaluate::<f64>().status, CalculationStatus::Running);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(c.evaluate::<f64>().status, CalculationStatus::Diverged);
        c.reset();
        assert_eq!(c.elapsed(), Duration::ZERO);
        assert_eq!(c.evaluate::<f64>().status, CalculationStatus::Running);
    }
}
