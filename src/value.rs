//! Numeric types and sampling utilities.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used in polynomial fitting and evaluation, ensuring
//! compatibility with nalgebra and floating-point operations.
//!
//! # Traits
//!
//! - [`Value`]: Extends `Scalar`, `RealField` and `FloatCore` to provide:
//!   - A canonical `two()` constant.
//!   - `try_cast` for safe type conversion with error handling.
//!   - Unambiguous `powi`, `abs` and `finite`.
//! - [`CoordExt`]: Access to the x and y channels of `(x, y)` datasets.
//!
//! # Sampling
//!
//! - [`linspace`]: Evenly spaced values over an inclusive range.
//!
//! # Example
//!
//! ```rust
//! use chirpfit::value::{linspace, Value};
//!
//! let t = linspace(0.0..=10.0, 100);
//! assert_eq!(t.len(), 100);
//! assert_eq!(t[99], 10.0);
//!
//! let two = f64::two();
//! ```
use std::ops::RangeInclusive;

use crate::error::Error;

/// Numeric type for curves
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Returns the absolute difference between two values.
    #[must_use]
    fn abs_sub(self, other: Self) -> Self {
        nalgebra::ComplexField::abs(self - other)
    }

    /// Returns true if the value is neither infinite nor NaN
    fn finite(self) -> bool {
        num_traits::float::FloatCore::is_finite(self)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Returns `count` evenly spaced values over `range`, endpoints included.
///
/// The last value is exactly `range.end()`, regardless of rounding in the step.
/// - `count == 0` yields an empty vector
/// - `count == 1` yields only `range.start()`
///
/// # Example
/// ```rust
/// # use chirpfit::value::linspace;
/// assert_eq!(linspace(0.0..=1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace<T: Value>(range: RangeInclusive<T>, count: usize) -> Vec<T> {
    let (start, end) = range.into_inner();
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / T::from_positive_int(count - 1);
            let mut values: Vec<T> = (0..count)
                .map(|i| start + T::from_positive_int(i) * step)
                .collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Extension trait for accessing the `x` and `y` coordinates of a dataset.
///
/// # Examples
///
/// ```
/// # use chirpfit::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// assert_eq!(data.x_range(), Some(0.0..=2.0));
/// ```
pub trait CoordExt<T: Value> {
    /// Returns an iterator over the x-coordinates of this value.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// Returns an iterator over the y-coordinates of this value.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Returns the x-coordinates of this value.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinates of this value.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Returns the inclusive range of x-coordinates, or `None` if there are none.
    fn x_range(&self) -> Option<RangeInclusive<T>> {
        let bounds = self.x_iter().fold(None, |acc: Option<(T, T)>, x| {
            Some(match acc {
                Some((min, max)) => (
                    nalgebra::RealField::min(min, x),
                    nalgebra::RealField::max(max, x),
                ),
                None => (x, x),
            })
        });
        bounds.map(|(start, end)| start..=end)
    }

    /// Returns the inclusive range of y-coordinates, or `None` if there are none.
    fn y_range(&self) -> Option<RangeInclusive<T>> {
        let bounds = self.y_iter().fold(None, |acc: Option<(T, T)>, y| {
            Some(match acc {
                Some((min, max)) => (
                    nalgebra::RealField::min(min, y),
                    nalgebra::RealField::max(max, y),
                ),
                None => (y, y),
            })
        });
        bounds.map(|(start, end)| start..=end)
    }
}
impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_spans_range() {
        let values = linspace(0.0..=10.0, 100);
        assert_eq!(values.len(), 100);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[99], 10.0);

        let step = 10.0 / 99.0;
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linspace_small_counts() {
        assert!(linspace(0.0..=1.0, 0).is_empty());
        assert_eq!(linspace(3.0..=7.0, 1), vec![3.0]);
        assert_eq!(linspace(3.0..=7.0, 2), vec![3.0, 7.0]);
    }

    #[test]
    fn test_linspace_reversed() {
        assert_eq!(linspace(1.0..=0.0, 3), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_coord_ranges() {
        let data = vec![(2.0, 5.0), (-1.0, 0.5), (4.0, -3.0)];
        assert_eq!(data.x_range(), Some(-1.0..=4.0));
        assert_eq!(data.y_range(), Some(-3.0..=5.0));

        let empty: Vec<(f64, f64)> = Vec::new();
        assert_eq!(empty.x_range(), None);
    }
}
