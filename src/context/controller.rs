//! Composite iteration controller.
//!
//! This module provides `IterationController`, which owns the criterion set of one solve and
//! turns the verdicts of all criteria into one authoritative [`CalculationStatus`] per iteration.
//!
//! # Resolution
//! Criteria are evaluated in their declared order on the same snapshot. Conflicting verdicts
//! are resolved by priority:
//!
//! `Failure > Cancelled > Diverged > Converged > Indeterminate > Running`
//!
//! A criterion answering `Indeterminate` abstains. If the set is empty or every criterion
//! abstains the controller reports `Indeterminate`, which points at a configuration problem
//! instead of running forever.
//!
//! # Lifecycle
//! - A terminal status is latched: later `evaluate` calls return it without consulting the
//!   criteria until `reset_to_precalculation_state`.
//! - `iteration_cancelled` (or a [`CancelHandle`] from another thread) forces `Cancelled`,
//!   overriding any other verdict, but leaves criterion history intact for diagnosis.
//! - Reset clears tracking state and keeps configuration.
//!
//! # Example
//! ```rust,ignore
//! let mut ctl = IterationController::<Vec<f64>>::from_options(&IteratorOptions::default())?;
//! loop {
//!     // ... one solver step updating x and r ...
//!     if ctl.evaluate(i, &x, &b, &r).is_terminal() {
//!         break;
//!     }
//! }
//! ```

use crate::config::IteratorOptions;
use crate::core::traits::{Real, Vector};
use crate::criteria::{
    DivergenceCriterion, IterationCountCriterion, NumericFailureCriterion, ResidualNormCriterion,
    StopCriterion, TimeoutCriterion,
};
use crate::error::KError;
use crate::utils::convergence::{CalculationStatus, IterationSnapshot, SolveStats};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe handle that cancels the owning controller's calculation.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent; never lost, even while `evaluate` is running.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Owns a criterion set and the current status of one iterative calculation.
#[derive(Debug)]
pub struct IterationController<V: Vector> {
    criteria: Vec<StopCriterion<V>>,
    status: CalculationStatus,
    cancelled: Arc<AtomicBool>,
    stats: SolveStats<Real<V>>,
}

impl<V: Vector> IterationController<V> {
    /// Controller over an explicit criterion set, evaluated in the given order.
    pub fn new(criteria: Vec<StopCriterion<V>>) -> Self {
        Self {
            criteria,
            status: CalculationStatus::Running,
            cancelled: Arc::new(AtomicBool::new(false)),
            stats: SolveStats::initial(),
        }
    }

    /// Standard set: numeric failure, iteration budget, residual norm, divergence and,
    /// when configured, a timeout.
    pub fn from_options(options: &IteratorOptions<Real<V>>) -> Result<Self, KError> {
        options.validate()?;
        let mut criteria: Vec<StopCriterion<V>> = vec![
            NumericFailureCriterion::new().into(),
            IterationCountCriterion::new(options.max_iterations)?.into(),
            ResidualNormCriterion::new(options.relative_tolerance, options.absolute_tolerance)?
                .with_minimum_iterations_below(options.minimum_iterations_below)?
                .into(),
            DivergenceCriterion::new(
                options.divergence_growth_factor,
                options.divergence_window,
                options.divergence_consecutive,
            )?
            .into(),
        ];
        if let Some(budget) = options.timeout {
            criteria.push(TimeoutCriterion::new(budget).into());
        }
        Ok(Self::new(criteria))
    }

    /// Append a criterion; it is evaluated after the existing ones.
    pub fn push_criterion(&mut self, criterion: impl Into<StopCriterion<V>>) {
        self.criteria.push(criterion.into());
    }

    pub fn with_criterion(mut self, criterion: impl Into<StopCriterion<V>>) -> Self {
        self.push_criterion(criterion);
        self
    }

    pub fn criteria(&self) -> &[StopCriterion<V>] {
        &self.criteria
    }

    /// Current status; `Running` before the first evaluation.
    pub fn status(&self) -> CalculationStatus {
        if self.cancelled.load(Ordering::Acquire) {
            CalculationStatus::Cancelled
        } else {
            self.status
        }
    }

    /// Statistics of the last evaluated iteration.
    pub fn last_stats(&self) -> SolveStats<Real<V>> {
        SolveStats {
            status: self.status(),
            converged: self.status().is_converged(),
            ..self.stats.clone()
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle { flag: Arc::clone(&self.cancelled) }
    }

    /// Determine the status of the calculation after `iteration` steps.
    pub fn evaluate(
        &mut self,
        iteration: usize,
        solution: &V,
        source: &V,
        residual: &V,
    ) -> CalculationStatus {
        self.evaluate_snapshot(&IterationSnapshot::new(iteration, solution, source, residual))
    }

    pub fn evaluate_snapshot(&mut self, snapshot: &IterationSnapshot<'_, V>) -> CalculationStatus {
        if self.cancelled.load(Ordering::Acquire) {
            return self.latch_cancellation();
        }
        if self.status.is_terminal() {
            return self.status;
        }

        if snapshot.dimension().is_none() {
            log::warn!(
                "iteration {}: vector dimensions differ or are zero (solution {}, source {}, residual {})",
                snapshot.iteration,
                snapshot.solution.dimension(),
                snapshot.source.dimension(),
                snapshot.residual.dimension()
            );
            self.stats.iterations = snapshot.iteration;
            return self.settle(CalculationStatus::Failure, "precondition");
        }

        let mut resolved: Option<(CalculationStatus, &'static str)> = None;
        for criterion in &mut self.criteria {
            let verdict = criterion.evaluate(snapshot);
            if verdict.status == CalculationStatus::Indeterminate {
                continue;
            }
            if resolved.is_none_or(|(s, _)| verdict.status.priority() > s.priority()) {
                resolved = Some((verdict.status, criterion.name()));
            }
        }
        let (status, source) = resolved.unwrap_or((CalculationStatus::Indeterminate, "none"));

        self.stats.iterations = snapshot.iteration;
        self.stats.final_residual = snapshot.residual_norm();
        self.settle(status, source)
    }

    /// Force `Cancelled`, independent of any criterion. Criterion history is kept.
    pub fn iteration_cancelled(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.latch_cancellation();
    }

    /// Back to `Running` with every criterion reset; tolerances and limits are kept.
    pub fn reset_to_precalculation_state(&mut self) {
        self.cancelled.store(false, Ordering::Release);
        self.status = CalculationStatus::Running;
        self.stats = SolveStats::initial();
        for criterion in &mut self.criteria {
            criterion.reset();
        }
        log::debug!("controller reset ({} criteria)", self.criteria.len());
    }

    fn latch_cancellation(&mut self) -> CalculationStatus {
        if self.status != CalculationStatus::Cancelled {
            log::info!("calculation cancelled at iteration {}", self.stats.iterations);
            self.status = CalculationStatus::Cancelled;
            for criterion in &mut self.criteria {
                criterion.cancel();
            }
        }
        CalculationStatus::Cancelled
    }

    fn settle(&mut self, status: CalculationStatus, source: &str) -> CalculationStatus {
        // a cancellation that raced with this evaluation wins
        if self.cancelled.load(Ordering::Acquire) {
            return self.latch_cancellation();
        }
        self.status = status;
        match status {
            CalculationStatus::Running => {}
            CalculationStatus::Failure => log::warn!(
                "iteration {}: failure reported by {source} (residual {})",
                self.stats.iterations,
                self.stats.final_residual
            ),
            CalculationStatus::Indeterminate => log::warn!(
                "iteration {}: no criterion reached a decision ({} configured)",
                self.stats.iterations,
                self.criteria.len()
            ),
            _ => log::debug!(
                "iteration {}: {status} by {source} (residual {})",
                self.stats.iterations,
                self.stats.final_residual
            ),
        }
        status
    }
}
