use std::{borrow::Cow, ops::RangeInclusive};

use crate::{
    basis::{Basis, IntegralBasis},
    error::{Error, Result},
    statistics,
    value::{linspace, CoordExt, Value},
};

/// Represents a polynomial function in a given basis.
///
/// Unlike [`crate::CurveFit`], this struct is **not tied to any dataset or matrix**, making it a canonical function that
/// can be evaluated for **any x-value** without range restrictions.
///
/// # Type Parameters
/// - `'a`: Lifetime for borrowed coefficients, if used.
/// - `B`: The polynomial basis (e.g., [`crate::basis::ChebyshevBasis`]).
/// - `T`: Numeric type for the coefficients, default is `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<'a, B, T: Value = f64>
where
    B: Basis<T>,
{
    degree: usize,
    basis: B,
    coefficients: Cow<'a, [T]>,
}
impl<'a, B, T: Value> Polynomial<'a, B, T>
where
    B: Basis<T>,
{
    /// Creates a [`Polynomial`] from a given basis, coefficients, and degree.
    ///
    /// The length of coefficients must be equal to `Basis::k(degree)`
    pub(crate) fn from_raw(basis: B, coefficients: Cow<'a, [T]>, degree: usize) -> Self {
        debug_assert_eq!(basis.k(degree), coefficients.len());
        Self {
            degree,
            basis,
            coefficients,
        }
    }

    /// Creates a new polynomial from a basis and coefficients, inferring the degree.
    ///
    /// # Errors
    /// Returns an error if the number of coefficients does not correspond to a valid degree for the given basis.
    pub fn from_basis(basis: B, coefficients: impl Into<Cow<'a, [T]>>) -> Result<Self> {
        let coefficients = coefficients.into();
        let degree = basis
            .degree(coefficients.len())
            .ok_or(Error::InvalidNumberOfParameters(coefficients.len()))?;
        Ok(Self::from_raw(basis, coefficients, degree))
    }

    /// Decomposes the polynomial into its basis, coefficients, and degree.
    pub fn into_inner(self) -> (B, Cow<'a, [T]>, usize) {
        (self.basis, self.coefficients, self.degree)
    }

    /// Returns a reference to the polynomial's basis.
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// Converts the polynomial into an owned version.
    ///
    /// This consumes the current `Polynomial` and returns a new one with
    /// `'static` lifetime, owning both the basis and the coefficients.
    pub fn into_owned(self) -> Polynomial<'static, B, T> {
        Polynomial {
            degree: self.degree,
            basis: self.basis,
            coefficients: Cow::Owned(self.coefficients.into_owned()),
        }
    }

    /// Returns a reference to the polynomial’s coefficients.
    ///
    /// The index of each coefficient the jth basis function.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// Formally, for each coefficient *j*, and the jth basis function *`B_j(x)`*, the relationship is:
    /// ```math
    /// y(x) = Σ (c_j * B_j(x))
    /// ```
    /// </div>
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Returns the degree of the polynomial.
    ///
    /// The number of basis functions in the expression is `k = degree + 1`.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluates the polynomial at a given x-value.
    ///
    /// `x` is mapped into the basis domain first; values outside the domain are extrapolated.
    ///
    /// # Example
    /// ```
    /// # use chirpfit::basis::ChebyshevBasis;
    /// let poly = ChebyshevBasis::new_polynomial((-1.0, 1.0), &[1.0, 2.0, 3.0]).unwrap();
    /// // T0 + 2·T1 + 3·T2 at x = 1 is 1 + 2 + 3
    /// assert_eq!(poly.y(1.0), 6.0);
    /// ```
    pub fn y(&self, x: T) -> T {
        let x = self.basis.normalize_x(x);
        self.basis.solve(x, &self.coefficients)
    }

    /// Evaluates the polynomial at multiple x-values.
    ///
    /// # Returns
    /// A `Vec` of `(x, y)` pairs corresponding to each input value.
    pub fn solve(&self, x: impl IntoIterator<Item = T>) -> Vec<(T, T)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }

    /// Evaluates the polynomial at `count` evenly spaced points over `range`, endpoints included.
    ///
    /// See [`crate::value::linspace`].
    pub fn solve_linspace(&self, range: RangeInclusive<T>, count: usize) -> Vec<(T, T)> {
        self.solve(linspace(range, count))
    }

    /// Calculates the R-squared value for the model compared to provided data.
    ///
    /// See [`statistics::r_squared`] for more details.
    pub fn r_squared(&self, data: &[(T, T)]) -> T {
        let x = data.x_iter();
        let y = data.y_iter();
        let y_fit = self.solve(x).into_iter().map(|(_, y)| y);

        statistics::r_squared(y, y_fit)
    }

    /// Computes the indefinite integral of this polynomial.
    ///
    /// # Parameters
    /// - `constant`: Value of the integral at the lower edge of the basis domain. Defaults to zero.
    ///
    /// # Errors
    /// If the basis cannot compute the integral coefficients, an error is returned.
    ///
    /// # Example
    /// ```rust
    /// # use chirpfit::basis::ChebyshevBasis;
    /// let poly = ChebyshevBasis::new_polynomial((0.0, 2.0), &[1.0, 0.5]).unwrap();
    /// let integral = poly.integral(Some(1.0)).unwrap();
    /// assert_eq!(integral.degree(), 2);
    /// ```
    pub fn integral(&self, constant: Option<T>) -> Result<Polynomial<'static, B::B2, T>>
    where
        B: IntegralBasis<T>,
    {
        let constant = constant.unwrap_or(T::zero());
        let new_degree = self.degree + 1;

        let (ib, ic) = self.basis.integral(&self.coefficients, constant)?;
        Ok(Polynomial::from_raw(ib, ic.into(), new_degree))
    }

    /// Computes the definite integral (area under the curve) of the polynomial
    /// between `x_min` and `x_max`, exactly, from its antiderivative.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// Area = ∫[x_min to x_max] f(x) dx = F(x_max) - F(x_min)
    /// ```
    /// </div>
    ///
    /// Reversed bounds give the negated area.
    ///
    /// # Errors
    /// If the basis cannot compute the integral coefficients, an error is returned.
    ///
    /// # Example
    /// ```rust
    /// # use chirpfit::basis::ChebyshevBasis;
    /// let poly = ChebyshevBasis::new_polynomial((0.0, 4.0), &[2.0]).unwrap();
    /// let area: f64 = poly.area_under_curve(0.0, 3.0, None).unwrap();
    /// assert!((area - 6.0).abs() < 1e-12);
    /// ```
    pub fn area_under_curve(&self, x_min: T, x_max: T, constant: Option<T>) -> Result<T>
    where
        B: IntegralBasis<T>,
    {
        let integral = self.integral(constant)?;
        Ok(integral.y(x_max) - integral.y(x_min))
    }
}

impl<'a, B, T: Value> AsRef<Polynomial<'a, B, T>> for Polynomial<'a, B, T>
where
    B: Basis<T>,
{
    fn as_ref(&self) -> &Polynomial<'a, B, T> {
        self
    }
}
