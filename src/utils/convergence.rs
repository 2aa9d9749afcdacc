//! Calculation status, per-iteration snapshots & solve statistics.

use crate::core::traits::{Real, Vector};
use std::cell::OnceCell;
use std::fmt;

/// Outcome of an iterative calculation as seen by the solver loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CalculationStatus {
    /// Keep iterating. The only non-terminal state.
    #[default]
    Running,
    /// A criterion accepted the current solution.
    Converged,
    /// The calculation failed to converge (growth, iteration or time budget).
    Diverged,
    /// No criterion could reach a decision.
    Indeterminate,
    /// Stopped on request of the caller.
    Cancelled,
    /// Invalid numeric state or violated precondition.
    Failure,
}

impl CalculationStatus {
    /// Everything except `Running` ends the calculation.
    pub fn is_terminal(self) -> bool {
        self != CalculationStatus::Running
    }

    pub fn is_converged(self) -> bool {
        self == CalculationStatus::Converged
    }

    /// Rank used when verdicts of several criteria conflict; higher wins.
    ///
    /// `Failure > Cancelled > Diverged > Converged > Indeterminate > Running`
    pub fn priority(self) -> u8 {
        match self {
            CalculationStatus::Running => 0,
            CalculationStatus::Indeterminate => 1,
            CalculationStatus::Converged => 2,
            CalculationStatus::Diverged => 3,
            CalculationStatus::Cancelled => 4,
            CalculationStatus::Failure => 5,
        }
    }
}

impl fmt::Display for CalculationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CalculationStatus::Running => "running",
            CalculationStatus::Converged => "converged",
            CalculationStatus::Diverged => "diverged",
            CalculationStatus::Indeterminate => "indeterminate",
            CalculationStatus::Cancelled => "cancelled",
            CalculationStatus::Failure => "failure",
        };
        f.write_str(s)
    }
}

/// A single criterion's answer for one iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Verdict<R> {
    pub status: CalculationStatus,
    /// Magnitude the criterion measured, if any.
    pub norm: Option<R>,
}

impl<R> Verdict<R> {
    pub fn new(status: CalculationStatus) -> Self {
        Self { status, norm: None }
    }

    pub fn with_norm(status: CalculationStatus, norm: R) -> Self {
        Self { status, norm: Some(norm) }
    }
}

/// Borrowed view of one iteration: index, solution, right-hand side and residual.
///
/// The residual norm is computed at most once per snapshot and shared by every criterion
/// that asks for it.
pub struct IterationSnapshot<'a, V: Vector> {
    pub iteration: usize,
    pub solution: &'a V,
    pub source: &'a V,
    pub residual: &'a V,
    residual_norm: OnceCell<Real<V>>,
}

impl<'a, V: Vector> IterationSnapshot<'a, V> {
    pub fn new(iteration: usize, solution: &'a V, source: &'a V, residual: &'a V) -> Self {
        Self {
            iteration,
            solution,
            source,
            residual,
            residual_norm: OnceCell::new(),
        }
    }

    /// ‖r‖₂, cached.
    pub fn residual_norm(&self) -> Real<V> {
        *self.residual_norm.get_or_init(|| self.residual.norm())
    }

    /// Common dimension of the three vectors, or `None` on mismatch or empty vectors.
    pub fn dimension(&self) -> Option<usize> {
        let n = self.solution.dimension();
        if n == 0 || self.source.dimension() != n || self.residual.dimension() != n {
            None
        } else {
            Some(n)
        }
    }
}

/// Iteration statistics reported back to the solver loop.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub converged: bool,
    pub status: CalculationStatus,
}

impl<T: num_traits::Float> SolveStats<T> {
    pub(crate) fn initial() -> Self {
        Self {
            iterations: 0,
            final_residual: T::nan(),
            converged: false,
            status: CalculationStatus::Running,
        }
    }
}
