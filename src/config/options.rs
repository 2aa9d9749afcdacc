//! Construction-time options for the standard criterion set.
//!
//! `IteratorOptions` carries the tolerances and limits a caller configures once per solve.
//! They are validated up front so that evaluation never has to report a configuration
//! error; `reset` on the controller leaves them untouched.

use crate::error::KError;
use num_traits::Float;
use std::time::Duration;

/// Tolerances & limits for the standard stop criteria.
#[derive(Clone, Debug, PartialEq)]
pub struct IteratorOptions<R> {
    /// Relative tolerance on ‖r‖ / ‖b‖ (> 0)
    pub relative_tolerance: R,
    /// Absolute tolerance on ‖r‖ (>= 0)
    pub absolute_tolerance: R,
    /// Iteration budget (> 0)
    pub max_iterations: usize,
    /// Consecutive evaluations the residual must stay below tolerance (>= 1)
    pub minimum_iterations_below: usize,
    /// Ratio latest/min over the window that counts as growth (> 1)
    pub divergence_growth_factor: R,
    /// Number of residual norms kept for the divergence check (>= 2)
    pub divergence_window: usize,
    /// Consecutive growing evaluations before divergence is declared (>= 1)
    pub divergence_consecutive: usize,
    /// Optional wall-clock budget
    pub timeout: Option<Duration>,
}

macro_rules! impl_default_options {
    ($($t:ty),*) => {$(
        impl Default for IteratorOptions<$t> {
            fn default() -> Self {
                Self {
                    relative_tolerance: 1e-8,
                    absolute_tolerance: 0.0,
                    max_iterations: 1000,
                    minimum_iterations_below: 1,
                    divergence_growth_factor: 1e4,
                    divergence_window: 10,
                    divergence_consecutive: 2,
                    timeout: None,
                }
            }
        }
    )*};
}

impl_default_options!(f32, f64);

impl<R: Float> IteratorOptions<R> {
    pub fn with_relative_tolerance(mut self, tol: R) -> Self {
        self.relative_tolerance = tol;
        self
    }
    pub fn with_absolute_tolerance(mut self, tol: R) -> Self {
        self.absolute_tolerance = tol;
        self
    }
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
    pub fn with_minimum_iterations_below(mut self, n: usize) -> Self {
        self.minimum_iterations_below = n;
        self
    }
    /// Set growth factor, window length and consecutive count of the divergence check.
    pub fn with_divergence(mut self, growth_factor: R, window: usize, consecutive: usize) -> Self {
        self.divergence_growth_factor = growth_factor;
        self.divergence_window = window;
        self.divergence_consecutive = consecutive;
        self
    }
    pub fn with_timeout(mut self, budget: Duration) -> Self {
        self.timeout = Some(budget);
        self
    }

    /// Reject invalid tolerances and limits.
    pub fn validate(&self) -> Result<(), KError> {
        check_tolerances(self.relative_tolerance, self.absolute_tolerance)?;
        check_positive("max_iterations", self.max_iterations)?;
        check_positive("minimum_iterations_below", self.minimum_iterations_below)?;
        check_divergence(
            self.divergence_growth_factor,
            self.divergence_window,
            self.divergence_consecutive,
        )
    }
}

pub(crate) fn check_tolerances<R: Float>(relative: R, absolute: R) -> Result<(), KError> {
    if !(relative.is_finite() && relative > R::zero()) {
        return Err(KError::InvalidTolerance(
            "relative",
            relative.to_f64().unwrap_or(f64::NAN),
        ));
    }
    if !(absolute.is_finite() && absolute >= R::zero()) {
        return Err(KError::InvalidTolerance(
            "absolute",
            absolute.to_f64().unwrap_or(f64::NAN),
        ));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: usize) -> Result<(), KError> {
    if value == 0 {
        return Err(KError::InvalidLimit(format!("{name} must be > 0")));
    }
    Ok(())
}

pub(crate) fn check_divergence<R: Float>(
    growth_factor: R,
    window: usize,
    consecutive: usize,
) -> Result<(), KError> {
    if !(growth_factor.is_finite() && growth_factor > R::one()) {
        return Err(KError::InvalidGrowthFactor(
            growth_factor.to_f64().unwrap_or(f64::NAN),
        ));
    }
    if window < 2 {
        return Err(KError::InvalidWindow(window));
    }
    check_positive("divergence_consecutive", consecutive)
}
