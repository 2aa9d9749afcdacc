//! Conjugate Gradient (unpreconditioned) per Saad §6.1, driven by an `IterationController`.
//!
//! The solver owns the Krylov recurrences and computes its own residual; every stopping
//! decision (tolerance, budget, divergence, NaN, cancellation) is delegated to the controller.
//! Works for real SPD and complex Hermitian positive definite systems.

use crate::config::IteratorOptions;
use crate::context::IterationController;
use crate::core::traits::{MatVec, Scalar, Vector};
use crate::error::KError;
use crate::solver::LinearSolver;
use crate::utils::convergence::SolveStats;
use num_traits::Zero;

pub struct CgSolver<T: Scalar> {
    /// Stop criteria and status of the current solve
    pub controller: IterationController<Vec<T>>,
}

impl<T: Scalar> CgSolver<T>
where
    IteratorOptions<T::Real>: Default,
{
    /// Relative tolerance and iteration budget on top of the default options.
    pub fn new(tol: T::Real, max_iters: usize) -> Result<Self, KError> {
        let options = IteratorOptions::default()
            .with_relative_tolerance(tol)
            .with_max_iterations(max_iters);
        Self::with_options(&options)
    }
}

impl<T: Scalar> CgSolver<T> {
    pub fn with_options(options: &IteratorOptions<T::Real>) -> Result<Self, KError> {
        Ok(Self { controller: IterationController::from_options(options)? })
    }

    /// Use a caller-assembled controller. It must contain a criterion that eventually stops
    /// (an iteration budget or a timeout), otherwise a stagnating solve never returns.
    pub fn with_controller(controller: IterationController<Vec<T>>) -> Self {
        Self { controller }
    }
}

impl<M, T> LinearSolver<M, Vec<T>> for CgSolver<T>
where
    M: MatVec<Vec<T>>,
    T: Scalar,
{
    type Error = KError;
    type Scalar = T::Real;

    fn solve(&mut self, a: &M, b: &Vec<T>, x: &mut Vec<T>) -> Result<SolveStats<T::Real>, KError> {
        let n = b.len();
        if x.len() != n {
            return Err(KError::SolveError(format!(
                "solution has length {} but right-hand side has length {n}",
                x.len()
            )));
        }
        let ctl = &mut self.controller;
        ctl.reset_to_precalculation_state();

        let mut r = vec![T::zero(); n];
        a.matvec(x, &mut r);
        for (rj, bj) in r.iter_mut().zip(b) {
            *rj = *bj - *rj;
        }
        let mut p = r.clone();
        let mut ap = vec![T::zero(); n];
        let mut rsq = r.dot(&r).re();

        let mut i = 0;
        while !ctl.evaluate(i, x, b, &r).is_terminal() {
            a.matvec(&p, &mut ap);
            let pap = p.dot(&ap).re();
            // NaN falls through and is reported by the numeric-failure criterion
            if pap <= T::Real::zero() {
                return Err(KError::IndefiniteMatrix);
            }
            let alpha = T::from_real(rsq / pap);
            for (xj, pj) in x.iter_mut().zip(&p) {
                *xj = *xj + alpha * *pj;
            }
            for (rj, apj) in r.iter_mut().zip(&ap) {
                *rj = *rj - alpha * *apj;
            }
            let rsq_new = r.dot(&r).re();
            let beta = T::from_real(rsq_new / rsq);
            for (pj, rj) in p.iter_mut().zip(&r) {
                *pj = *rj + beta * *pj;
            }
            rsq = rsq_new;
            i += 1;
        }

        let stats = ctl.last_stats();
        log::debug!(
            "cg finished: {} after {} iterations (residual {})",
            stats.status,
            stats.iterations,
            stats.final_residual
        );
        Ok(stats)
    }
}
