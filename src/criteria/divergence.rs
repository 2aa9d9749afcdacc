//! Divergence stop criterion.
//!
//! Keeps the last `window` residual norms. An evaluation counts as growing when the latest
//! norm exceeds the window minimum by more than `growth_factor`; divergence is declared only
//! after `consecutive` growing evaluations in a row, so a single transient spike is tolerated.

use crate::config::options::check_divergence;
use crate::core::traits::{Scalar, Vector};
use crate::error::KError;
use crate::utils::convergence::{CalculationStatus, IterationSnapshot, Verdict};
use num_traits::Float;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct DivergenceCriterion<R> {
    growth_factor: R,
    window: usize,
    consecutive: usize,
    history: VecDeque<R>,
    growth_streak: usize,
    status: CalculationStatus,
}

impl<R: Float> DivergenceCriterion<R> {
    pub fn new(growth_factor: R, window: usize, consecutive: usize) -> Result<Self, KError> {
        check_divergence(growth_factor, window, consecutive)?;
        Ok(Self {
            growth_factor,
            window,
            consecutive,
            history: VecDeque::with_capacity(window),
            growth_streak: 0,
            status: CalculationStatus::Running,
        })
    }

    pub fn growth_factor(&self) -> R {
        self.growth_factor
    }
    pub fn window(&self) -> usize {
        self.window
    }
    pub fn consecutive(&self) -> usize {
        self.consecutive
    }
    /// Residual norms currently held, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &R> {
        self.history.iter()
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

        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(r);

        let min = self.history.iter().fold(R::infinity(), |m, &v| m.min(v));
        let growing = if min > R::zero() {
            r / min > self.growth_factor
        } else {
            r > R::zero()
        };
        self.growth_streak = if growing { self.growth_streak + 1 } else { 0 };

        self.status = if self.growth_streak >= self.consecutive {
            CalculationStatus::Diverged
        } else {
            CalculationStatus::Running
        };
        Verdict::with_norm(self.status, r)
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.growth_streak = 0;
        self.status = CalculationStatus::Running;
    }

    pub fn cancel(&mut self) {
        self.status = CalculationStatus::Cancelled;
    }
}
