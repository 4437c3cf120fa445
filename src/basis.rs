//! Polynomial basis functions for curve fitting
//!
//! This module defines the [`Basis`] trait, which abstracts the family of functions a
//! fit is expressed in. The fitting code in [`crate::CurveFit`] and the evaluation code in
//! [`crate::Polynomial`] are generic over it.
//!
//! # Provided Bases
//! - [`ChebyshevBasis`]: Chebyshev polynomials of the first kind on [-1, 1]. Inputs are mapped
//!   affinely from the data range, which keeps high-degree fits (a hundred terms and more)
//!   well conditioned where a monomial basis would not be.
//!
//! # Rolling Your Own
//! To implement a custom basis:
//! 1. Implement the `Basis<T>` trait for your type.
//! 2. Define how to populate a row of the Vandermonde-style matrix in `fill_matrix_row`.
//! 3. Optionally override `solve(&self, x: T, coefficients: &[T]) -> T` with a faster evaluator.
//!
//! Implement [`IntegralBasis`] as well to get exact areas through [`crate::Polynomial::area_under_curve`].

use nalgebra::MatrixViewMut;

use crate::{error::Result, value::Value};

pub(crate) mod chebyshev;
pub use chebyshev::ChebyshevBasis;

/// A trait representing a polynomial basis.
///
/// Assumes a Vandermonde structure for the basis functions.
///
/// A polynomial basis defines the set of functions φ₀, φ₁, …, φₙ used to represent a polynomial.
/// While you can implement this for custom bases, it is not meant to be used on it's own,
/// but through `Polynomial` or `CurveFit`, which are generic over basis.
///
/// # Type Parameters
/// - `T`: The numeric type used for coefficients and evaluation (e.g., `f64`).
pub trait Basis<T: Value>: Sized + Clone + std::fmt::Debug + Send + Sync {
    /// Create a new basis from the given data range
    ///
    /// Initializes any needed metadata for normalization
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self;

    /// Returns the number of basis functions needed for a polynomial of a given degree.
    ///
    /// - Degree 0 → 1 function (constant)
    /// - Degree 1 → 2 functions (constant + φ₁)
    #[inline(always)]
    fn k(&self, degree: usize) -> usize {
        degree + 1
    }

    /// Returns the polynomial degree corresponding to a given number of basis functions.
    ///
    /// Returns `None` if `k` is zero.
    #[inline(always)]
    fn degree(&self, k: usize) -> Option<usize> {
        if k > 0 {
            Some(k - 1)
        } else {
            None
        }
    }

    /// Populates a row of a Vandermonde matrix with this basis evaluated at `x`.
    ///
    /// All basis functions are written into `row` starting at column `start_index`.
    ///
    /// `x` will be normalized by the caller using the `normalize_x` method.
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        row: MatrixViewMut<T, R, C, RS, CS>,
    );

    /// Maps a data-space `x` into the natural domain of this basis.
    fn normalize_x(&self, x: T) -> T;

    /// Maps a basis-space `x` back into data space.
    fn denormalize_x(&self, x: T) -> T;

    /// Evaluates the jth basis function φⱼ at an already normalized `x`.
    fn solve_function(&self, j: usize, x: T) -> T;

    /// Evaluates `Σ cⱼ·φⱼ(x)` at an already normalized `x`.
    ///
    /// The default sums [`Basis::solve_function`] term by term.
    fn solve(&self, x: T, coefficients: &[T]) -> T {
        coefficients
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (j, &c)| acc + c * self.solve_function(j, x))
    }
}

/// Trait for bases that support integration of polynomials.
///
/// # Type Parameters
/// - `T`: Numeric type for coefficients.
/// - `B2`: Basis type returned by the integral.
pub trait IntegralBasis<T: Value>: Basis<T> {
    /// The basis type returned by the integral operation.
    type B2: Basis<T>;

    /// Computes the antiderivative of a polynomial in this basis, with respect to data-space `x`.
    ///
    /// # Parameters
    /// - `coefficients`: Slice of coefficients of the polynomial to integrate.
    /// - `constant`: Constant of integration; the value of the antiderivative at the
    ///   lower edge of the basis domain.
    ///
    /// # Errors
    /// Returns an error if the coefficients are empty, or on casting errors.
    ///
    /// # Returns
    /// - The integral's basis and coefficients (one more than the input).
    fn integral(&self, coefficients: &[T], constant: T) -> Result<(Self::B2, Vec<T>)>;
}

/// A trait for orthogonal polynomial bases.
///
/// Orthogonal bases have special properties that make them useful for numerical stability and
/// integration. This trait extends the `Basis` trait with methods specific to orthogonal bases.
pub trait OrthogonalBasis<T: Value>: Basis<T> {
    /// Returns the nodes and weights for Gauss quadrature.
    ///
    /// The basis is orthogonal against these nodes
    fn gauss_nodes(&self, n: usize) -> Vec<(T, T)>;

    /// Returns the exact value of the integral of the square of the nth basis function over the weight function.
    fn gauss_normalization(&self, n: usize) -> T;

    /// Computes the inner product of two basis functions using the provided nodes and weights.
    ///
    /// Get these from [`OrthogonalBasis::gauss_nodes`].
    fn inner_product(&self, i: usize, j: usize, nodes: &[(T, T)]) -> T {
        let mut sum = T::zero();
        for (x, w) in nodes {
            sum += self.solve_function(i, *x) * self.solve_function(j, *x) * *w;
        }
        sum
    }

    /// Constructs the Gram matrix for the first `functions` basis functions using Gauss quadrature.
    ///
    /// Should have shape (n, n), and be ~zero outside the diagonal.
    fn gauss_matrix(&self, functions: usize, nodes: usize) -> nalgebra::DMatrix<T> {
        let nodes = self.gauss_nodes(nodes);
        let mut mat = nalgebra::DMatrix::<T>::zeros(functions, functions);
        for i in 0..functions {
            for j in i..functions {
                let val = self.inner_product(i, j, &nodes);
                mat[(i, j)] = val;
                if i != j {
                    mat[(j, i)] = val;
                }
            }
        }
        mat
    }
}
