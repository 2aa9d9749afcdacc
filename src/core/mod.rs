//! Numeric scalar/vector abstraction consumed by the stop criteria.

pub mod traits;
pub mod wrappers;

pub use traits::{MatVec, Real, Scalar, Vector};
