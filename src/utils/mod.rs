//! Shared status and snapshot types.

pub mod convergence;
pub use convergence::{CalculationStatus, IterationSnapshot, SolveStats, Verdict};
