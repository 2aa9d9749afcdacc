//! kstop: convergence control for Krylov-style iterative solvers
//!
//! This crate decides, once per iteration, whether an iterative linear solver should keep going,
//! has converged, has failed, or was cancelled. Independent stop criteria (residual norm,
//! divergence, iteration budget, target value, numeric failure, timeout) are composed by an
//! `IterationController` that resolves their verdicts into one status. Everything is generic over
//! real and complex scalar fields; criteria only ever compare real norms.

pub mod config;
pub mod context;
pub mod core;
pub mod criteria;
pub mod error;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use context::*;
pub use self::core::*;
pub use criteria::*;
pub use error::*;
pub use solver::*;
pub use utils::*;
