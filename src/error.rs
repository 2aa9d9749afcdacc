use thiserror::Error;

// Unified error type for kstop

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KError {
    #[error("invalid {0} tolerance (got {1})")]
    InvalidTolerance(&'static str, f64),
    #[error("invalid iteration limit: {0}")]
    InvalidLimit(String),
    #[error("divergence growth factor must exceed 1 (got {0})")]
    InvalidGrowthFactor(f64),
    #[error("divergence window must hold at least 2 norms (got {0})")]
    InvalidWindow(usize),
    #[error("indefinite matrix detected (p^T A p <= 0)")]
    IndefiniteMatrix,
    #[error("solve error: {0}")]
    SolveError(String),
}
