//! Configuration for the convergence controller.

pub mod options;
pub use options::IteratorOptions;
