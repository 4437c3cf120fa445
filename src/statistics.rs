//! Functions and tools for evaluating polynomial fits
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//!
//! # Error Metrics
//! - [`sum_squared_error`]: Least-squares objective. Lower is better.
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values. Lower is better.
//! - [`root_mean_squared_error`]: Square root of MSE, giving error in same units as observed values. Lower is better.
//! - [`max_absolute_error`]: Worst single deviation. Lower is better.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`stddev_and_mean`]: Standard deviation and mean of a dataset.
//!
//! # Domain mapping
//! - [`DomainNormalizer`]: Affine map between a data range and a basis window such as [-1, 1].
//!
//! # Examples
//!
//! ```rust
//! use chirpfit::statistics::{r_squared, root_mean_squared_error};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! let rmse = root_mean_squared_error(y.into_iter(), y_fit.into_iter());
//! println!("R² = {r2}, RMSE = {rmse}");
//! ```
use crate::value::Value;

/// Computes the coefficient of determination (R²) of a model's predictions.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - Σ (y_i - y_fit_i)² / Σ (y_i - mean(y))²
/// ```
/// </div>
///
/// # Returns
/// - `1` for a perfect fit
/// - `0` when the model does no better than the mean
/// - Negative values when the model is worse than the mean
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let y: Vec<T> = y.collect();
    let y_mean = mean(y.iter().copied());

    let mut ss_total = T::zero();
    let mut ss_residual = T::zero();
    for (y, y_fit) in y.into_iter().zip(y_fit) {
        ss_total += Value::powi(y - y_mean, 2);
        ss_residual += Value::powi(y - y_fit, 2);
    }

    T::one() - (ss_residual / ss_total)
}

/// Computes the sum of squared errors (SSE); the quantity least squares minimizes.
///
/// Returns zero for empty input.
pub fn sum_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let (total, _) = sse_with_n(y, y_fit);
    total
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MSE = Σ (y_i - y_fit_i)² / N
/// ```
/// </div>
///
/// Returns `NaN` for empty input.
///
/// # Example
/// ```rust
/// # use chirpfit::statistics::mean_squared_error;
/// let y = vec![-1.0, -2.0];
/// let y_fit = vec![1.0, 2.0];
/// assert_eq!(mean_squared_error(y.into_iter(), y_fit.into_iter()), 10.0);
/// ```
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let (total, n) = sse_with_n(y, y_fit);
    total / n
}

/// Computes the root mean squared error (RMSE) between two sets of values.
///
/// The RMSE is in the same units as the observed data.
pub fn root_mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean_squared_error(y, y_fit).sqrt()
}

/// Computes the largest absolute difference between two sets of values.
///
/// Returns zero for empty input.
pub fn max_absolute_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    y.zip(y_fit)
        .map(|(y, y_fit)| y.abs_sub(y_fit))
        .fold(T::zero(), nalgebra::RealField::max)
}

fn sse_with_n<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> (T, T) {
    let mut total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        total += Value::powi(y - y_fit, 2);
        n += T::one();
    }
    (total, n)
}

/// Computes the arithmetic mean of a sequence of values.
///
/// Returns `NaN` if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = chirpfit::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = T::zero();
    for value in data {
        sum += value;
        count += T::one();
    }
    sum / count
}

/// Computes the standard deviation of a sequence of values, along with its mean.
/// - Uses the population formula (divides by `N`) rather than `N-1`.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let (s, m) = chirpfit::statistics::stddev_and_mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// assert!((s - (2.0f64 / 3.0).sqrt()).abs() < 1e-15);
/// ```
pub fn stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let data: Vec<_> = data.collect();
    let mean = mean(data.iter().copied());
    let mut sum_sq_diff = T::zero();
    let mut count = T::zero();
    for value in data {
        sum_sq_diff += Value::powi(value - mean, 2);
        count += T::one();
    }
    let dev = (sum_sq_diff / count).sqrt();

    (dev, mean)
}

/// Affine map from a source range (the data's x-range) onto a destination range (the basis window).
///
/// Unlike a clamp, values outside the source range map linearly outside the
/// destination range, so a polynomial can still be evaluated (extrapolated) there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainNormalizer<T: Value> {
    src_range: (T, T),
    dst_range: (T, T),
}
impl<T: Value> DomainNormalizer<T> {
    /// Creates a new `DomainNormalizer` for the given source and destination ranges.
    pub fn new(src_range: (T, T), dst_range: (T, T)) -> Self {
        Self {
            src_range,
            dst_range,
        }
    }

    /// Creates a new `DomainNormalizer` from an inclusive source range and a destination range.
    pub fn from_range(src_range: std::ops::RangeInclusive<T>, dst_range: (T, T)) -> Self {
        let (min, max) = src_range.into_inner();
        Self::new((min, max), dst_range)
    }

    /// Returns the source range of the normalizer.
    pub fn src_range(&self) -> (T, T) {
        self.src_range
    }

    /// Returns the destination range of the normalizer.
    pub fn dst_range(&self) -> (T, T) {
        self.dst_range
    }

    /// Returns `d(dst) / d(src)`, the slope of the map.
    pub fn scale(&self) -> T {
        let (src_min, src_max) = self.src_range;
        let (dst_min, dst_max) = self.dst_range;
        (dst_max - dst_min) / (src_max - src_min)
    }

    /// Normalizes a value from the source range to the destination range.
    pub fn normalize(&self, x: T) -> T {
        let (src_min, _) = self.src_range;
        let (dst_min, _) = self.dst_range;
        dst_min + (x - src_min) * self.scale()
    }

    /// Denormalizes a value from the destination range back to the source range.
    pub fn denormalize(&self, x: T) -> T {
        let (src_min, _) = self.src_range;
        let (dst_min, _) = self.dst_range;
        src_min + (x - dst_min) / self.scale()
    }
}
impl<T: Value> std::fmt::Display for DomainNormalizer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (src_min, src_max) = self.src_range;
        let (dst_min, dst_max) = self.dst_range;
        write!(f, "T[ {src_min}..{src_max} -> {dst_min}..{dst_max} ]")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn r_squared_perfect_fit() {
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![1.0, 2.0, 3.0];
        let r2 = r_squared::<f64>(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 1.0);
    }

    #[test]
    fn r_squared_bad_fit() {
        // mean(y) = 2, SST = 2, SSE = 2
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![2.0, 2.0, 2.0];
        let r2 = r_squared::<f64>(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 0.0);
    }

    #[test]
    fn sse_and_mse() {
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![0.0, 0.0, 0.0];
        let sse = sum_squared_error::<f64>(y.iter().copied(), y_fit.iter().copied());
        let mse = mean_squared_error::<f64>(y.iter().copied(), y_fit.iter().copied());
        assert_eq!(sse, 14.0);
        assert!((mse - 14.0 / 3.0).abs() < 1e-12);

        let rmse = root_mean_squared_error::<f64>(y.iter().copied(), y_fit.iter().copied());
        assert!((rmse - (14.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn mse_empty_input_returns_nan() {
        let y: Vec<f64> = vec![];
        let y_fit: Vec<f64> = vec![];
        let mse = mean_squared_error::<f64>(y.into_iter(), y_fit.into_iter());
        assert!(mse.is_nan());
    }

    #[test]
    fn max_absolute_error_picks_worst() {
        let y = vec![1.0, -2.0, 3.0];
        let y_fit = vec![1.5, 1.0, 3.0];
        let max = max_absolute_error::<f64>(y.into_iter(), y_fit.into_iter());
        assert_eq!(max, 3.0);
    }

    #[test]
    fn normalizer_round_trip() {
        let norm = DomainNormalizer::new((0.0, 10.0), (-1.0, 1.0));
        assert_eq!(norm.normalize(0.0), -1.0);
        assert_eq!(norm.normalize(10.0), 1.0);
        assert_eq!(norm.normalize(5.0), 0.0);
        assert_eq!(norm.scale(), 0.2);

        for x in [0.0, 1.25, std::f64::consts::PI, 7.5, 10.0] {
            assert!((norm.denormalize(norm.normalize(x)) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn normalizer_extrapolates() {
        let norm = DomainNormalizer::new((0.0, 10.0), (-1.0, 1.0));
        assert_eq!(norm.normalize(20.0), 3.0);
        assert_eq!(norm.normalize(-10.0), -3.0);
    }
}
