//! Scalar and vector implementations for standard, `num-complex` and `faer` types.
//!
//! This module lets `f32`, `f64` and `num_complex::Complex<f32 | f64>` act as scalar fields,
//! `Vec<T>` act as the vector type seen by stop criteria, and `faer::Mat` act as an operator
//! for the reference solver.
//!
//! # Features
//! - Conjugated dot product and Euclidean norm for `Vec<T>`, with optional Rayon parallelism.
//! - Element-wise finiteness checks used by the numeric-failure criterion.
//! - Matrix-vector multiplication for `faer` dense matrices over any scalar field.
//!
//! # References
//! - [faer crate documentation](https://docs.rs/faer)
//! - [num-complex crate documentation](https://docs.rs/num-complex)

use crate::core::traits::{MatVec, Scalar, Vector};
use faer::Mat;
use num_complex::Complex;
use num_traits::{Float, FromPrimitive, Zero};
use std::fmt::{Debug, Display};

macro_rules! impl_real_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            type Real = $t;
            #[inline]
            fn conj(&self) -> $t {
                *self
            }
            #[inline]
            fn modulus_sqr(&self) -> $t {
                *self * *self
            }
            #[inline]
            fn modulus(&self) -> $t {
                <$t>::abs(*self)
            }
            #[inline]
            fn re(&self) -> $t {
                *self
            }
            #[inline]
            fn from_real(r: $t) -> $t {
                r
            }
            #[inline]
            fn is_finite(&self) -> bool {
                <$t>::is_finite(*self)
            }
        }
    )*};
}

impl_real_scalar!(f32, f64);

/// Complex scalars measure magnitudes in their real component type.
impl<R> Scalar for Complex<R>
where
    R: Float + FromPrimitive + Debug + Display + Send + Sync + 'static,
{
    type Real = R;
    #[inline]
    fn conj(&self) -> Self {
        Complex::conj(self)
    }
    #[inline]
    fn modulus_sqr(&self) -> R {
        self.norm_sqr()
    }
    #[inline]
    fn modulus(&self) -> R {
        self.norm()
    }
    #[inline]
    fn re(&self) -> R {
        self.re
    }
    #[inline]
    fn from_real(r: R) -> Self {
        Complex::new(r, R::zero())
    }
    #[inline]
    fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

/// Sum of `f` over the entries, reduced in parallel when Rayon is enabled.
fn sum_real<T, F>(xs: &[T], f: F) -> T::Real
where
    T: Scalar,
    F: Fn(&T) -> T::Real + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        xs.par_iter().map(f).reduce(T::Real::zero, |acc, v| acc + v)
    }
    #[cfg(not(feature = "rayon"))]
    {
        xs.iter().map(f).fold(T::Real::zero(), |acc, v| acc + v)
    }
}

/// Implements the vector abstraction for `Vec<T>`, with optional Rayon parallelism.
impl<T: Scalar> Vector for Vec<T> {
    type Scalar = T;

    fn dimension(&self) -> usize {
        self.len()
    }

    fn at(&self, i: usize) -> T {
        self[i]
    }

    /// Computes the conjugated dot product `x^H y`.
    fn dot(&self, other: &Self) -> T {
        assert_eq!(self.len(), other.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            self.as_slice()
                .par_iter()
                .zip(other.as_slice().par_iter())
                .map(|(xi, yi)| xi.conj() * *yi)
                .reduce(T::zero, |acc, v| acc + v)
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.iter()
                .zip(other.iter())
                .map(|(xi, yi)| xi.conj() * *yi)
                .fold(T::zero(), |acc, v| acc + v)
        }
    }

    /// Computes the Euclidean norm `||x||_2`; NaN and infinite entries propagate.
    ///
    /// Finite entries always give a finite norm: when the plain sum of squares overflows the
    /// entries are rescaled by the largest modulus and summed again.
    fn norm(&self) -> T::Real {
        let ssq = sum_real(self, |xi| xi.modulus_sqr());
        if ssq.is_finite() || !Vector::is_finite(self) {
            return ssq.sqrt();
        }
        let scale = self
            .iter()
            .map(|xi| xi.modulus())
            .fold(T::Real::zero(), T::Real::max);
        scale
            * sum_real(self, |xi| {
                let t = xi.modulus() / scale;
                t * t
            })
            .sqrt()
    }

    fn is_finite(&self) -> bool {
        self.iter().all(Scalar::is_finite)
    }
}

/// Implements matrix-vector multiplication for `faer::Mat`.
///
/// Computes `y = A * x` where `A` is a dense matrix, `x` and `y` are vectors.
impl<T: Scalar> MatVec<Vec<T>> for Mat<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.nrows(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.ncols(), x.len(), "Input vector x has incorrect length");
        for i in 0..self.nrows() {
            let mut acc = T::zero();
            for j in 0..self.ncols() {
                acc = acc + self[(i, j)] * x[j];
            }
            y[i] = acc;
        }
    }
}
