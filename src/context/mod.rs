//! Context module for kstop.
//!
//! This module provides the controller that drives a criterion set through one iterative
//! calculation and exposes cancellation and reset to the owning solver loop.
//!
//! Modules:
//! - [`controller`]: Contains `IterationController` and its thread-safe `CancelHandle`.
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.
//! - Barrett et al., Templates for the Solution of Linear Systems, §4.2 (stopping criteria).

pub mod controller;
pub use controller::{CancelHandle, IterationController};
