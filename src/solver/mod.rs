//! Solver interfaces driven by the convergence controller.

use crate::utils::convergence::SolveStats;

/// Common interface for iterative solvers whose stopping decision is delegated to an
/// [`IterationController`](crate::context::IterationController).
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd;
    /// Solve A·x = b, writing result into `x` (which also holds the initial guess).
    /// Returns iteration stats (including the final status).
    fn solve(&mut self, a: &M, b: &V, x: &mut V) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

pub mod cg;
pub use cg::CgSolver;
