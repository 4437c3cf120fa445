use std::{borrow::Cow, ops::RangeInclusive};

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    basis::{Basis, IntegralBasis},
    error::{Error, Result},
    quadrature::{self, Integral, QuadratureOptions},
    statistics,
    value::{CoordExt, Value},
    Polynomial,
};

/// Normalized Chebyshev polynomial curve
///
/// Uses the Chebyshev polynomials, which are orthogonal polynomials defined on the interval \[-1, 1\].
/// These polynomials are particularly useful for minimizing Runge's phenomenon in polynomial interpolation.
pub type ChebyshevFit<'data, T = f64> = CurveFit<'data, crate::basis::ChebyshevBasis<T>, T>;

/// Represents a polynomial fit to a set of `(x, y)` samples.
///
/// The fit keeps its source data, so it can report residuals and quality metrics,
/// and it remembers the sampled x-range: [`CurveFit::y`] refuses to extrapolate.
/// Use [`CurveFit::as_polynomial`] to evaluate anywhere.
///
/// # Type Parameters
/// - `'data`: Lifetime of the borrowed source data, if borrowed.
/// - `B`: The polynomial basis, usually [`crate::basis::ChebyshevBasis`].
/// - `T`: Numeric type, default is `f64`.
///
/// # Example
/// ```
/// # use chirpfit::ChebyshevFit;
/// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
/// let fit = ChebyshevFit::new(data, 2).unwrap();
/// println!("Coefficients: {:?}", fit.coefficients());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit<'data, B, T: Value = f64>
where
    B: Basis<T>,
{
    data: Cow<'data, [(T, T)]>,
    x_range: RangeInclusive<T>,
    function: Polynomial<'static, B, T>,
    rank: usize,
}
impl<'data, T: Value, B> CurveFit<'data, B, T>
where
    B: Basis<T>,
{
    /// Turns the dataset into a basis matrix and y-values vector.
    fn create_matrix(data: &[(T, T)], basis: &B, k: usize) -> (DMatrix<T>, DVector<T>) {
        let mut bigx = DMatrix::zeros(data.len(), k);
        let b = DVector::from_iterator(data.len(), data.iter().map(|&(_, y)| y));

        for (row, (x, _)) in bigx.row_iter_mut().zip(data.iter()) {
            let x = basis.normalize_x(*x);
            basis.fill_matrix_row(0, x, row);
        }

        (bigx, b)
    }

    /// Scales every column to unit norm in place, returning the scale of each column.
    ///
    /// Zero columns keep a scale of one.
    fn scale_columns(matrix: &mut DMatrix<T>) -> Vec<T> {
        let mut scales = Vec::with_capacity(matrix.ncols());
        for mut col in matrix.column_iter_mut() {
            let norm = col.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt();
            let norm = if norm > T::zero() { norm } else { T::one() };
            for v in col.iter_mut() {
                *v /= norm;
            }
            scales.push(norm);
        }
        scales
    }

    /// Solves the least-squares system using SVD.
    ///
    /// Returns the coefficients and the numerical rank of the matrix.
    fn solve_matrix(mut matrix: DMatrix<T>, b: &DVector<T>) -> Result<(Vec<T>, usize)> {
        let size = matrix.shape();
        let scales = Self::scale_columns(&mut matrix);

        let decomp = SVD::new_unordered(matrix, true, true);

        // ~= machine_epsilon * max(size) * max_singular
        let machine_epsilon = T::epsilon();
        let max_size = size.0.max(size.1);
        let sigma_max = decomp.singular_values.max();
        let epsilon = machine_epsilon * T::try_cast(max_size)? * sigma_max;
        let rank = decomp
            .singular_values
            .iter()
            .filter(|&&s| s > epsilon)
            .count();

        // Solve for X in `SVD * X = b`, dropping singular values below epsilon
        let big_x = decomp.solve(b, epsilon).map_err(Error::Algebra)?;
        let coefficients: Vec<T> = big_x
            .iter()
            .zip(&scales)
            .map(|(&c, &s)| c / s)
            .collect();

        if coefficients.iter().any(|c| !c.finite()) {
            return Err(Error::Algebra("NaN in coefficients"));
        }

        Ok((coefficients, rank))
    }

    /// Returns an owned version of this curve fit, with a full copy of the data.
    #[must_use]
    pub fn to_owned(&self) -> CurveFit<'static, B, T> {
        CurveFit {
            data: Cow::Owned(self.data.to_vec()),
            x_range: self.x_range.clone(),
            function: self.function.clone(),
            rank: self.rank,
        }
    }

    /// Creates a new polynomial curve fit for the given data and degree.
    ///
    /// Fits a polynomial to the provided `(x, y)` points in the basis `B`, by least squares.
    ///
    /// # Errors
    /// Returns an [`Error`] in the following cases:
    /// - `Error::NoData`: `data` is empty.
    /// - `Error::DegenerateDomain`: every sample has the same x-value.
    /// - `Error::Algebra`: the linear system could not be solved.
    /// - `Error::CastFailed`: a numeric value could not be cast to the target type.
    ///
    /// # Behavior
    /// - Builds the basis matrix, filling each row using [`Basis::fill_matrix_row`].
    /// - Scales each column to unit norm, then solves `A * x = b` with an SVD.
    /// - Singular values below `ε·max(n, k)·σ_max` are treated as zero.
    ///
    /// A degree at or above the number of samples is accepted: the system is
    /// underdetermined, so the minimum-norm solution is returned and a warning is logged.
    /// [`CurveFit::rank`] reports how many directions were actually resolved.
    ///
    /// # Example
    /// ```
    /// # use chirpfit::ChebyshevFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = ChebyshevFit::new(data, 2).unwrap();
    /// assert_eq!(fit.rank(), 3);
    /// ```
    pub fn new(data: impl Into<Cow<'data, [(T, T)]>>, degree: usize) -> Result<Self> {
        let data: Cow<_> = data.into();

        let x_range = data.x_range().ok_or(Error::NoData)?;
        if x_range.start() == x_range.end() {
            return Err(Error::DegenerateDomain);
        }

        let basis = B::from_range(x_range.clone());
        let k = basis.k(degree);

        let (m, b) = Self::create_matrix(&data, &basis, k);
        let (coefs, rank) = Self::solve_matrix(m, &b)?;

        if rank < k {
            log::warn!(
                "degree {degree} fit is rank deficient ({rank} of {k} coefficients resolved from {} samples); using the minimum-norm solution",
                data.len()
            );
        }

        let function = Polynomial::from_raw(basis, coefs.into(), degree);
        let fit = Self {
            data,
            x_range,
            function,
            rank,
        };

        log::debug!(
            "fit degree {degree} to {} samples: rank {rank}, rmse {:e}",
            fit.data.len(),
            fit.root_mean_squared_error()
        );

        Ok(fit)
    }

    /// Returns a reference to the basis of the fit.
    pub fn basis(&self) -> &B {
        self.function.basis()
    }

    /// Returns the numerical rank of the (column-scaled) basis matrix.
    ///
    /// Equal to the number of coefficients for a well-posed fit.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns `true` if fewer directions were resolved than there are coefficients.
    #[must_use]
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.function.coefficients().len()
    }

    /// Computes the residuals of the fit.
    ///
    /// ```math
    /// residual_i = y_i - f(x_i)
    /// ```
    ///
    /// # Returns
    /// `(x, residual)` pairs, one per data point.
    pub fn residuals(&self) -> Vec<(T, T)> {
        let y = self.data.y_iter();
        y.zip(self.solution())
            .map(|(y, (x, y_fit))| (x, y - y_fit))
            .collect()
    }

    /// The least-squares objective: `Σ (y_i - f(x_i))²`.
    pub fn sum_squared_residuals(&self) -> T {
        statistics::sum_squared_error(self.data.y_iter(), self.fitted_y())
    }

    /// Mean squared error of the fit against its source data.
    ///
    /// See [`statistics::mean_squared_error`].
    pub fn mean_squared_error(&self) -> T {
        statistics::mean_squared_error(self.data.y_iter(), self.fitted_y())
    }

    /// Root mean squared error of the fit against its source data.
    ///
    /// See [`statistics::root_mean_squared_error`].
    pub fn root_mean_squared_error(&self) -> T {
        statistics::root_mean_squared_error(self.data.y_iter(), self.fitted_y())
    }

    /// The largest absolute residual.
    pub fn max_abs_residual(&self) -> T {
        statistics::max_absolute_error(self.data.y_iter(), self.fitted_y())
    }

    /// R² of the fit against its source data.
    ///
    /// See [`statistics::r_squared`].
    pub fn r_squared(&self) -> T {
        statistics::r_squared(self.data.y_iter(), self.fitted_y())
    }

    fn fitted_y(&self) -> impl Iterator<Item = T> + '_ {
        self.data.x_iter().map(|x| self.function.y(x))
    }

    /// Returns the degree of the fitted polynomial.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.function.degree()
    }

    /// Returns the coefficients of the fitted polynomial, in basis order.
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        self.function.coefficients()
    }

    /// Returns the source data of the fit.
    #[must_use]
    pub fn data(&self) -> &[(T, T)] {
        &self.data
    }

    /// Returns the inclusive x-range of the source data.
    #[must_use]
    pub fn x_range(&self) -> RangeInclusive<T> {
        self.x_range.clone()
    }

    /// Evaluates the fit at a given x-value.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if `x` is outside the original data bounds.
    ///
    /// # Example
    /// ```
    /// # use chirpfit::ChebyshevFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = ChebyshevFit::new(data, 2).unwrap();
    /// assert!(fit.y(1.0).is_ok());
    /// assert!(fit.y(3.0).is_err());
    /// ```
    pub fn y(&self, x: T) -> Result<T> {
        if !self.x_range.contains(&x) {
            return Err(Error::DataRange(
                format!("{}", self.x_range.start()),
                format!("{}", self.x_range.end()),
            ));
        }

        Ok(self.function.y(x))
    }

    /// Returns the fitted y-values at the original x-values, as `(x, y)` pairs.
    pub fn solution(&self) -> Vec<(T, T)> {
        self.data
            .x_iter()
            .map(|x| (x, self.function.y(x)))
            .collect()
    }

    /// Evaluates the fit at multiple x-values.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if any `x` is outside the original data bounds.
    pub fn solve(&self, x: impl IntoIterator<Item = T>) -> Result<Vec<(T, T)>> {
        x.into_iter().map(|x| Ok((x, self.y(x)?))).collect()
    }

    /// Borrows the fitted polynomial, which can be evaluated outside the data range.
    pub fn as_polynomial(&self) -> &Polynomial<'static, B, T> {
        &self.function
    }

    /// Converts the fit into its polynomial, dropping the source data.
    pub fn into_polynomial(self) -> Polynomial<'static, B, T> {
        self.function
    }

    /// Exact area under the fitted polynomial between `x_min` and `x_max`, from its antiderivative.
    ///
    /// # Errors
    /// If the basis cannot compute the integral coefficients, an error is returned.
    pub fn area_under_curve(&self, x_min: T, x_max: T) -> Result<T>
    where
        B: IntegralBasis<T>,
    {
        self.function.area_under_curve(x_min, x_max, None)
    }

    /// Returns a serializable summary of the fit.
    pub fn properties(&self) -> FitProperties<T> {
        FitProperties {
            degree: self.degree(),
            data_points: self.data().len(),
            rank: self.rank,
            coefficients: self.coefficients().to_vec(),
            mse: self.mean_squared_error(),
            r_squared: self.r_squared(),
        }
    }
}

impl<B: Basis<f64>> CurveFit<'_, B, f64> {
    /// Integrates the fitted polynomial over `[a, b]` with adaptive Gauss-Kronrod quadrature.
    ///
    /// The polynomial is evaluated without range checks; bounds outside the data
    /// range are integrated by extrapolation and logged as a warning.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBounds`] if either bound is not finite.
    ///
    /// # Example
    /// ```
    /// # use chirpfit::{ChebyshevFit, quadrature::QuadratureOptions};
    /// let data: Vec<_> = (0..=10).map(|i| (i as f64, 2.0)).collect();
    /// let fit = ChebyshevFit::new(&data, 3).unwrap();
    /// let area = fit.integrate(0.0, 10.0, &QuadratureOptions::default()).unwrap();
    /// assert!((area.value - 20.0).abs() < 1e-9);
    /// ```
    pub fn integrate(&self, a: f64, b: f64, options: &QuadratureOptions) -> Result<Integral> {
        if !self.x_range.contains(&a) || !self.x_range.contains(&b) {
            log::warn!(
                "integrating degree {} fit over {a}..{b}, outside its data range {}..{}",
                self.degree(),
                self.x_range.start(),
                self.x_range.end()
            );
        }

        let integral = quadrature::integrate(|x| self.function.y(x), a, b, options)?;
        log::debug!(
            "degree {} over {a}..{b}: {:?} ± {:e} ({:?}, {} evaluations)",
            self.degree(),
            integral.value,
            integral.abs_error,
            integral.status,
            integral.evaluations
        );
        Ok(integral)
    }
}

impl<B, T: Value> AsRef<Polynomial<'static, B, T>> for CurveFit<'_, B, T>
where
    B: Basis<T>,
{
    fn as_ref(&self) -> &Polynomial<'static, B, T> {
        &self.function
    }
}

/// A set of diagnostic properties for a curve fit.
///
/// Can be serialized to JSON or other formats.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct FitProperties<T: Value> {
    /// The degree of the fitted polynomial.
    pub degree: usize,

    /// The number of data points used in the fit.
    pub data_points: usize,

    /// The numerical rank of the basis matrix.
    pub rank: usize,

    /// The coefficients of the fitted polynomial.
    pub coefficients: Vec<T>,

    /// The mean squared error of the fit.
    pub mse: T,

    /// The R² value of the fit.
    pub r_squared: T,
}
