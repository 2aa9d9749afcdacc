//! Core numeric traits for kstop.
//!
//! Stop criteria never compare scalars directly: every decision is taken on a real,
//! totally-ordered magnitude derived from the scalar field, so the same criteria work
//! for `f64` and `Complex<f64>` alike.

use num_traits::{Float, FromPrimitive, Zero};
use std::fmt::{Debug, Display};
use std::ops::{Add, Mul, Sub};

/// A real or complex scalar field.
pub trait Scalar:
    Copy
    + Debug
    + Send
    + Sync
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + 'static
{
    /// Real type carrying magnitudes (the field itself for real scalars).
    type Real: Float + FromPrimitive + Debug + Display + Send + Sync + 'static;

    /// Complex conjugate (identity for real scalars).
    fn conj(&self) -> Self;
    /// Squared modulus |z|².
    fn modulus_sqr(&self) -> Self::Real;
    /// Modulus |z|.
    fn modulus(&self) -> Self::Real {
        self.modulus_sqr().sqrt()
    }
    /// Real part.
    fn re(&self) -> Self::Real;
    /// Embed a real value into the field.
    fn from_real(r: Self::Real) -> Self;
    /// False for NaN or infinite components.
    fn is_finite(&self) -> bool;
}

/// The vector abstraction consumed by stop criteria.
pub trait Vector {
    /// Element type.
    type Scalar: Scalar;
    /// Number of entries.
    fn dimension(&self) -> usize;
    /// Entry `i`; callers stay within `0..dimension()`.
    fn at(&self, i: usize) -> Self::Scalar;
    /// Conjugated inner product xᴴ y.
    fn dot(&self, other: &Self) -> Self::Scalar;
    /// Euclidean norm ‖x‖₂ as a real magnitude.
    fn norm(&self) -> <Self::Scalar as Scalar>::Real;
    /// True when no entry is NaN or infinite.
    fn is_finite(&self) -> bool {
        (0..self.dimension()).all(|i| self.at(i).is_finite())
    }
}

/// Real magnitude type of a vector's scalar field.
pub type Real<V> = <<V as Vector>::Scalar as Scalar>::Real;

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}
