use nalgebra::MatrixViewMut;

use crate::{
    basis::{Basis, IntegralBasis, OrthogonalBasis},
    error::{Error, Result},
    statistics::DomainNormalizer,
    value::Value,
};

/// Normalized Chebyshev basis for polynomial curves.
///
/// This basis uses the Chebyshev polynomials of the first kind, which form an
/// orthogonal family of polynomials on the interval [-1, 1]. Orthogonality makes
/// them far more numerically stable than the standard monomial basis, especially
/// for higher-degree polynomials.
///
/// Inputs are mapped affinely so that the fit domain [`x_min`, `x_max`] lands on [-1, 1].
/// Points outside the domain are mapped outside [-1, 1] rather than clamped, so a
/// polynomial in this basis can be evaluated anywhere.
///
/// # Why Chebyshev?
/// - Minimizes **Runge’s phenomenon** in polynomial interpolation.
/// - Provides near-optimal polynomial approximations with lower error.
/// - Evaluates in O(n) with the Clenshaw recurrence, without ever forming monomials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChebyshevBasis<T: Value = f64> {
    normalizer: DomainNormalizer<T>,
}
impl<T: Value> ChebyshevBasis<T> {
    /// Creates a new Chebyshev basis that normalizes inputs from the given range to [-1, 1].
    pub fn new(x_min: T, x_max: T) -> Self {
        let normalizer = DomainNormalizer::new((x_min, x_max), (-T::one(), T::one()));
        Self { normalizer }
    }

    /// Creates a Chebyshev basis from an existing domain normalizer.
    pub fn from_normalizer(normalizer: DomainNormalizer<T>) -> Self {
        Self { normalizer }
    }

    /// Returns the domain normalizer of this basis.
    pub fn normalizer(&self) -> &DomainNormalizer<T> {
        &self.normalizer
    }

    /// Returns the data-space domain that maps onto [-1, 1].
    pub fn domain(&self) -> (T, T) {
        self.normalizer.src_range()
    }

    /// Creates a new Chebyshev polynomial with the given coefficients over the specified x-range.
    ///
    /// # Errors
    /// Returns an error if `coefficients` is empty.
    ///
    /// # Example
    /// ```rust
    /// use chirpfit::basis::ChebyshevBasis;
    /// let poly = ChebyshevBasis::new_polynomial((-1.0, 1.0), &[1.0, 0.0, -0.5]).unwrap();
    /// assert_eq!(poly.y(0.0), 1.5);
    /// ```
    pub fn new_polynomial(
        x_range: (T, T),
        coefficients: &[T],
    ) -> Result<crate::Polynomial<'_, Self, T>> {
        let basis = Self::new(x_range.0, x_range.1);
        crate::Polynomial::<Self, T>::from_basis(basis, coefficients)
    }
}
impl<T: Value> Basis<T> for ChebyshevBasis<T> {
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self {
        let normalizer = DomainNormalizer::from_range(x_range, (-T::one(), T::one()));
        Self { normalizer }
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        mut row: MatrixViewMut<'_, T, R, C, RS, CS>,
    ) {
        // The recurrence needs the two columns before `start_index`, so seed them explicitly
        let (mut t0, mut t1) = (T::one(), x);
        for j in 0..row.ncols() {
            let t = match j {
                0 => T::one(),
                1 => x,
                _ => {
                    let t = T::two() * x * t1 - t0;
                    t0 = t1;
                    t1 = t;
                    t
                }
            };

            if j >= start_index {
                row[j] = t;
            }
        }
    }

    #[inline(always)]
    fn normalize_x(&self, x: T) -> T {
        self.normalizer.normalize(x)
    }

    #[inline(always)]
    fn denormalize_x(&self, x: T) -> T {
        self.normalizer.denormalize(x)
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: T) -> T {
        match j {
            0 => T::one(), // T0(x) = 1
            1 => x,        // T1(x) = x
            _ => {
                // Tn(x) = 2x*T_{n-1}(x) - T_{n-2}(x)
                let mut t0 = T::one();
                let mut t1 = x;
                let mut t = T::zero();

                for _ in 2..=j {
                    t = T::two() * x * t1 - t0;
                    t0 = t1;
                    t1 = t;
                }

                t
            }
        }
    }

    /// Clenshaw's recurrence:
    /// `b_k = c_k + 2x·b_{k+1} - b_{k+2}`, then `y = c_0 + x·b_1 - b_2`
    fn solve(&self, x: T, coefficients: &[T]) -> T {
        let Some((&c0, rest)) = coefficients.split_first() else {
            return T::zero();
        };

        let (mut b1, mut b2) = (T::zero(), T::zero());
        for &c in rest.iter().rev() {
            let b0 = c + T::two() * x * b1 - b2;
            b2 = b1;
            b1 = b0;
        }

        c0 + x * b1 - b2
    }
}

impl<T: Value> IntegralBasis<T> for ChebyshevBasis<T> {
    type B2 = Self;

    fn integral(&self, coefficients: &[T], constant: T) -> Result<(Self::B2, Vec<T>)> {
        if coefficients.is_empty() {
            return Err(Error::InvalidNumberOfParameters(0));
        }

        // dx = du / scale, where u is the normalized coordinate
        let scale = self.normalizer.scale();
        let c: Vec<T> = coefficients.iter().map(|&c| c / scale).collect();

        // ∫T0 = T1, ∫T1 = T2/4, ∫Tn = T_{n+1}/(2(n+1)) - T_{n-1}/(2(n-1))
        let mut integral = vec![T::zero(); c.len() + 1];
        integral[1] = c[0];
        if c.len() > 1 {
            integral[2] = c[1] / T::try_cast(4)?;
        }
        for (j, &cj) in c.iter().enumerate().skip(2) {
            integral[j + 1] = cj / T::try_cast(2 * (j + 1))?;
            integral[j - 1] -= cj / T::try_cast(2 * (j - 1))?;
        }

        // Pin the value at the lower edge of the domain, where Tn(-1) = (-1)^n
        let at_lower = self.solve(-T::one(), &integral);
        integral[0] += constant - at_lower;

        Ok((*self, integral))
    }
}

impl<T: Value> OrthogonalBasis<T> for ChebyshevBasis<T> {
    fn gauss_nodes(&self, n: usize) -> Vec<(T, T)> {
        let mut nodes = Vec::with_capacity(n);
        let n2 = T::two() * T::from_positive_int(n);
        let w = T::pi() / T::from_positive_int(n);
        for k in 1..=n {
            let tk1 = T::two() * T::from_positive_int(k) - T::one();
            let x = (T::pi() * tk1 / n2).cos();
            nodes.push((x, w));
        }

        nodes
    }

    fn gauss_normalization(&self, n: usize) -> T {
        if n == 0 {
            T::pi()
        } else {
            T::pi() / T::two()
        }
    }
}
