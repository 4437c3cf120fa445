//! Utilities for perturbing sampled data
//!
//! Data can be transformed by anything implementing the [`Transform`] trait, which applies the transformation over a set of values.
//!
//! The [`Transformable`] trait is a convenient wrapper that allows you to apply transformations to the Y channel of an (X, Y) dataset.
//!
//! # Noise: [`NoiseTransform`] / [`ApplyNoise`]
//! - Gaussian noise: [`NoiseTransform::Gaussian`]
//!   - [`ApplyNoise::apply_normal_noise`] applies independent Gaussian noise to the Y channel.
//!   - [`ApplyNoise::apply_correlated_noise`] mixes each sample with the previous one, so the noise varies smoothly.
//!
//! The spread of the noise is relative to the data: `strength` multiplies the standard deviation of the values being
//! perturbed. A fixed seed reproduces the same noise on every run.
//!
//! ```rust
//! use chirpfit::transforms::ApplyNoise;
//!
//! let data: Vec<(f64, f64)> = (0..100).map(|i| (f64::from(i), f64::from(i).sin())).collect();
//! let a = data.clone().apply_normal_noise(0.01, Some(7)).unwrap();
//! let b = data.apply_normal_noise(0.01, Some(7)).unwrap();
//! assert_eq!(a, b);
//! ```
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::{
    error::{Error, Result},
    statistics,
    value::Value,
};

pub use rand;
pub use rand_distr;

/// Trait for applying transformations to data.
pub trait Transform<T: Value> {
    /// Applies the transformation to the given data.
    ///
    /// # Errors
    /// Returns an error if the transformation parameters are unusable for this data.
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()>;
}

/// Trait for transforming data.
pub trait Transformable<T: Value> {
    /// Transforms the data in place.
    ///
    /// # Errors
    /// Propagates the error of the transformation.
    fn transform<R: Transform<T>>(&mut self, transform: &R) -> Result<()>;
}
impl<T: Value> Transformable<T> for Vec<(T, T)> {
    fn transform<R: Transform<T>>(&mut self, transform: &R) -> Result<()> {
        transform.apply(self.iter_mut().map(|(_, y)| y))
    }
}

/// Types of noise based transforms for data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseTransform<T: Value> {
    /// Adds Gaussian noise to a signal or dataset.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// - Each value is drawn from a normal distribution `N(0, (strength·σ)²)`, where `σ` is the
    ///   standard deviation of the data. Constant data uses `σ = 1`.
    /// - Correlation is introduced by mixing the new sample with the previous one:
    ///
    /// ```math
    /// xₙ = ρ * xₙ₋₁ + √(1 − ρ²) * εₙ
    /// ```
    /// </div>
    Gaussian {
        /// Multiplier for the standard deviation of the data.
        strength: T,

        /// Correlation factor between consecutive samples, in `[0, 1)`.
        /// `0` gives independent noise.
        rho: T,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },
}
impl<T: Value> NoiseTransform<T> {
    fn rng(seed: Option<u64>) -> rand::rngs::SmallRng {
        match seed {
            Some(s) => rand::rngs::SmallRng::seed_from_u64(s),
            None => rand::rngs::SmallRng::from_rng(&mut rand::rng()),
        }
    }
}
impl<T> Transform<T> for NoiseTransform<T>
where
    T: Value + num_traits::Float,
    rand_distr::StandardNormal: Distribution<T>,
{
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()> {
        match self {
            NoiseTransform::Gaussian {
                strength,
                rho,
                seed,
            } => {
                if !Value::finite(*strength) || *strength < T::zero() {
                    return Err(Error::InvalidConfig(format!(
                        "noise strength must be finite and non-negative, got {strength}"
                    )));
                }
                if !(T::zero()..T::one()).contains(rho) {
                    return Err(Error::InvalidConfig(format!(
                        "noise correlation must be in [0, 1), got {rho}"
                    )));
                }

                let data = data.collect::<Vec<_>>();
                if data.is_empty() {
                    return Ok(());
                }

                let values: Vec<T> = data.iter().map(|v| **v).collect();
                let (std_dev, _) = statistics::stddev_and_mean(values.iter().copied());
                let std_dev = if std_dev > T::zero() && Value::finite(std_dev) {
                    std_dev
                } else {
                    T::one()
                };

                let gaussian = Normal::new(T::zero(), std_dev * *strength)
                    .map_err(|e| Error::InvalidConfig(e.to_string()))?;

                let mut rng = Self::rng(*seed);
                let mix = num_traits::Float::sqrt(T::one() - *rho * *rho);
                let mut state = gaussian.sample(&mut rng);
                for v in data {
                    state = *rho * state + gaussian.sample(&mut rng) * mix;
                    *v += state;
                }

                Ok(())
            }
        }
    }
}

/// Trait for applying noise transforms to the Y channel of an (X, Y) dataset.
pub trait ApplyNoise<T: Value>: Sized {
    /// Adds independent Gaussian noise to the Y channel.
    ///
    /// - `strength`: Multiplier for the standard deviation of the Y values.
    /// - `seed` *(optional)*: Fixes the RNG seed for reproducibility.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if `strength` is negative or not finite.
    fn apply_normal_noise(self, strength: T, seed: Option<u64>) -> Result<Self>;

    /// Adds correlated Gaussian noise to the Y channel.
    ///
    /// - `rho`: Correlation between consecutive samples, in `[0, 1)`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if `strength` or `rho` is out of range.
    fn apply_correlated_noise(self, strength: T, rho: T, seed: Option<u64>) -> Result<Self>;
}
impl<T> ApplyNoise<T> for Vec<(T, T)>
where
    T: Value + num_traits::Float,
    rand_distr::StandardNormal: Distribution<T>,
{
    fn apply_normal_noise(self, strength: T, seed: Option<u64>) -> Result<Self> {
        self.apply_correlated_noise(strength, T::zero(), seed)
    }

    fn apply_correlated_noise(mut self, strength: T, rho: T, seed: Option<u64>) -> Result<Self> {
        self.transform(&NoiseTransform::Gaussian {
            strength,
            rho,
            seed,
        })?;
        Ok(self)
    }
}

/// Serializable noise settings for an experiment.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Multiplier for the standard deviation of the signal.
    pub strength: f64,

    /// Correlation between consecutive samples.
    pub rho: f64,

    /// RNG seed. `None` draws fresh noise every run.
    pub seed: Option<u64>,
}
impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            strength: 0.01,
            rho: 0.0,
            seed: Some(42),
        }
    }
}
impl NoiseConfig {
    /// Applies this noise to the Y channel of `data`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the parameters are out of range.
    pub fn apply(&self, data: Vec<(f64, f64)>) -> Result<Vec<(f64, f64)>> {
        data.apply_correlated_noise(self.strength, self.rho, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diffs(a: &[(f64, f64)], b: &[(f64, f64)]) -> (f64, f64) {
        let diffs: Vec<f64> = a.iter().zip(b).map(|((_, y1), (_, y2))| y2 - y1).collect();
        let mean: f64 = diffs.iter().sum::<f64>() / diffs.len() as f64;
        let std_dev: f64 =
            (diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64).sqrt();
        (mean, std_dev)
    }

    #[test]
    fn test_normal_noise_is_relative() {
        // Alternating ±2 has a standard deviation of 2
        let data: Vec<_> = (0..2000)
            .map(|i| (f64::from(i), if i % 2 == 0 { 2.0 } else { -2.0 }))
            .collect();
        let noisy = data.clone().apply_normal_noise(0.1, Some(42)).unwrap();

        let (mean, std_dev) = diffs(&data, &noisy);
        assert!(mean.abs() < 0.05);
        assert!((std_dev - 0.2).abs() < 0.03, "std_dev = {std_dev}");

        // x is untouched
        assert!(data.iter().zip(&noisy).all(|(a, b)| a.0 == b.0));
    }

    #[test]
    fn test_constant_data_uses_unit_scale() {
        let data = vec![(1.0, 2.0); 1000];
        let noisy = data.clone().apply_normal_noise(0.1, Some(42)).unwrap();

        let (mean, std_dev) = diffs(&data, &noisy);
        assert!(mean.abs() < 0.1);
        assert!((std_dev - 0.1).abs() < 0.05);
    }

    #[test]
    fn test_correlated_noise() {
        let data = vec![(1.0, 2.0); 1000];
        let noisy = data.clone().apply_correlated_noise(0.1, 0.9, Some(42)).unwrap();

        let (mean, std_dev) = diffs(&data, &noisy);
        assert!(mean.abs() < 0.1);
        assert!((std_dev - 0.1).abs() < 0.05);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let data: Vec<_> = (0..100).map(|i| (f64::from(i), f64::from(i).cos())).collect();
        let a = data.clone().apply_normal_noise(0.05, Some(7)).unwrap();
        let b = data.clone().apply_normal_noise(0.05, Some(7)).unwrap();
        let c = data.clone().apply_normal_noise(0.05, Some(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let zero = data.clone().apply_normal_noise(0.0, Some(7)).unwrap();
        assert_eq!(zero, data);
    }

    #[test]
    fn test_invalid_noise() {
        let data = vec![(0.0, 1.0), (1.0, 2.0)];
        assert!(data.clone().apply_normal_noise(-1.0, None).is_err());
        assert!(data.clone().apply_normal_noise(f64::NAN, None).is_err());
        assert!(data.apply_correlated_noise(0.1, 1.0, None).is_err());
    }

    #[test]
    fn test_noise_config() {
        let config: NoiseConfig = serde_json::from_str(r#"{ "strength": 0.2 }"#).unwrap();
        assert_eq!(config.strength, 0.2);
        assert_eq!(config.seed, Some(42));

        let data: Vec<_> = (0..10).map(|i| (f64::from(i), f64::from(i))).collect();
        assert_eq!(config.apply(data.clone()).unwrap(), config.apply(data).unwrap());
    }
}
