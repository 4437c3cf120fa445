//! Swept-frequency (chirp) signal generation
//!
//! A [`Chirp`] is a sinusoid whose instantaneous frequency follows a [`SweepMethod`],
//! passing through `f0` at `t = 0` and `f1` at `t = t1`:
//!
//! ```math
//! amplitude(t) = sin(φ(t) + offset),   φ(t) = 2π ∫₀ᵗ f(τ) dτ
//! ```
//!
//! The default is the quadratic sweep from 0 to 1 Hz over the first second,
//! whose phase is `2π·t³/3`.
//!
//! # Example
//! ```rust
//! use chirpfit::signal::Chirp;
//!
//! let samples = Chirp::default().sample(0.0..=10.0, 100).unwrap();
//! assert_eq!(samples.len(), 100);
//! assert_eq!(samples[0], (0.0, 0.0));
//! ```
use std::{f64::consts::PI, ops::RangeInclusive};

use crate::{
    error::{Error, Result},
    value::linspace,
};

/// The law the instantaneous frequency follows between `(0, f0)` and `(t1, f1)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMethod {
    /// `f(t) = f0 + (f1 - f0)·t/t1`
    Linear,

    /// A parabola through `(0, f0)` and `(t1, f1)`.
    ///
    /// - `vertex_zero: true`: vertex at `t = 0`, so `f(t) = f0 + (f1 - f0)·t²/t1²`
    /// - `vertex_zero: false`: vertex at `t = t1`, so `f(t) = f1 + (f0 - f1)·(t1 - t)²/t1²`
    Quadratic {
        /// Put the vertex of the parabola at `t = 0` rather than `t = t1`.
        vertex_zero: bool,
    },

    /// `f(t) = f0·(f1/f0)^(t/t1)`. Requires `f0·f1 > 0`.
    Logarithmic,

    /// `f(t) = f0·f1·t1 / ((f0 - f1)·t + f1·t1)`. Requires non-zero `f0` and `f1`.
    Hyperbolic,
}
impl Default for SweepMethod {
    fn default() -> Self {
        Self::Quadratic { vertex_zero: true }
    }
}
impl std::fmt::Display for SweepMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Quadratic { vertex_zero: true } => write!(f, "quadratic"),
            Self::Quadratic { vertex_zero: false } => write!(f, "quadratic (vertex at t1)"),
            Self::Logarithmic => write!(f, "logarithmic"),
            Self::Hyperbolic => write!(f, "hyperbolic"),
        }
    }
}

/// A swept-frequency sinusoid in sine phase, so `amplitude(0) = sin(offset)`.
///
/// Construct with [`Chirp::new`], which validates the sweep, or use [`Chirp::default`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Chirp {
    /// Frequency at `t = 0`
    f0: f64,

    /// Time at which `f1` is reached
    t1: f64,

    /// Frequency at `t = t1`
    f1: f64,

    /// Sweep law
    method: SweepMethod,

    /// Phase offset, in degrees
    phase_degrees: f64,
}
impl Default for Chirp {
    fn default() -> Self {
        Self {
            f0: 0.0,
            t1: 1.0,
            f1: 1.0,
            method: SweepMethod::default(),
            phase_degrees: 0.0,
        }
    }
}
impl Chirp {
    /// Creates a new chirp sweeping from `f0` at `t = 0` to `f1` at `t = t1`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChirp`] if a parameter is not finite, `t1` is zero,
    /// or the frequencies are invalid for the sweep method.
    pub fn new(f0: f64, t1: f64, f1: f64, method: SweepMethod) -> Result<Self> {
        let chirp = Self {
            f0,
            t1,
            f1,
            method,
            phase_degrees: 0.0,
        };
        chirp.validate()?;
        Ok(chirp)
    }

    /// Sets the phase offset, in degrees.
    ///
    /// An offset of 90° turns the sine into a cosine.
    #[must_use]
    pub fn with_phase(mut self, degrees: f64) -> Self {
        self.phase_degrees = degrees;
        self
    }

    /// Checks the parameters describe a valid sweep.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChirp`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let Self {
            f0,
            t1,
            f1,
            method,
            phase_degrees,
        } = *self;

        if ![f0, t1, f1, phase_degrees].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidChirp("parameters must be finite"));
        }
        if t1 == 0.0 {
            return Err(Error::InvalidChirp("t1 must be non-zero"));
        }

        match method {
            SweepMethod::Logarithmic if f0 * f1 <= 0.0 => Err(Error::InvalidChirp(
                "logarithmic sweeps need f0 and f1 of the same, non-zero sign",
            )),
            SweepMethod::Hyperbolic if f0 == 0.0 || f1 == 0.0 => Err(Error::InvalidChirp(
                "hyperbolic sweeps need non-zero f0 and f1",
            )),
            _ => Ok(()),
        }
    }

    /// Frequency at `t = 0`
    #[must_use]
    pub fn f0(&self) -> f64 {
        self.f0
    }

    /// Time at which `f1` is reached
    #[must_use]
    pub fn t1(&self) -> f64 {
        self.t1
    }

    /// Frequency at `t = t1`
    #[must_use]
    pub fn f1(&self) -> f64 {
        self.f1
    }

    /// The sweep law
    #[must_use]
    pub fn method(&self) -> SweepMethod {
        self.method
    }

    /// Phase offset, in degrees
    #[must_use]
    pub fn phase_degrees(&self) -> f64 {
        self.phase_degrees
    }

    /// Instantaneous frequency at time `t`, in cycles per unit time.
    #[must_use]
    pub fn instantaneous_frequency(&self, t: f64) -> f64 {
        let Self { f0, t1, f1, .. } = *self;
        match self.method {
            SweepMethod::Linear => f0 + (f1 - f0) * t / t1,
            SweepMethod::Quadratic { vertex_zero: true } => f0 + (f1 - f0) * t * t / (t1 * t1),
            SweepMethod::Quadratic { vertex_zero: false } => {
                f1 + (f0 - f1) * (t1 - t).powi(2) / (t1 * t1)
            }
            SweepMethod::Logarithmic => f0 * (f1 / f0).powf(t / t1),
            SweepMethod::Hyperbolic => f0 * f1 * t1 / ((f0 - f1) * t + f1 * t1),
        }
    }

    /// Integrated phase at time `t`, in radians, excluding the phase offset.
    ///
    /// `phase(0) = 0` for every sweep law.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn phase(&self, t: f64) -> f64 {
        let Self { f0, t1, f1, .. } = *self;
        let cycles = match self.method {
            SweepMethod::Linear => {
                let beta = (f1 - f0) / t1;
                f0 * t + 0.5 * beta * t * t
            }
            SweepMethod::Quadratic { vertex_zero: true } => {
                let beta = (f1 - f0) / (t1 * t1);
                f0 * t + beta * t.powi(3) / 3.0
            }
            SweepMethod::Quadratic { vertex_zero: false } => {
                let beta = (f0 - f1) / (t1 * t1);
                f1 * t + beta * (t1.powi(3) - (t1 - t).powi(3)) / 3.0
            }
            SweepMethod::Logarithmic if f0 == f1 => f0 * t,
            SweepMethod::Logarithmic => {
                let beta = t1 / (f1 / f0).ln();
                beta * f0 * ((f1 / f0).powf(t / t1) - 1.0)
            }
            SweepMethod::Hyperbolic if f0 == f1 => f0 * t,
            SweepMethod::Hyperbolic => {
                let singular_point = -f1 * t1 / (f0 - f1);
                -singular_point * f0 * (1.0 - t / singular_point).abs().ln()
            }
        };

        2.0 * PI * cycles
    }

    /// Signal value at time `t`: `sin(phase(t) + offset)`.
    #[must_use]
    pub fn amplitude(&self, t: f64) -> f64 {
        (self.phase(t) + self.phase_degrees.to_radians()).sin()
    }

    /// Samples the chirp at `count` evenly spaced times over `domain`, endpoints included.
    ///
    /// # Errors
    /// - [`Error::InvalidBounds`] if either end of the domain is not finite.
    /// - [`Error::NoData`] if `count` is zero.
    pub fn sample(&self, domain: RangeInclusive<f64>, count: usize) -> Result<Vec<(f64, f64)>> {
        let (start, end) = (*domain.start(), *domain.end());
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::InvalidBounds(start.to_string(), end.to_string()));
        }
        if count == 0 {
            return Err(Error::NoData);
        }

        log::debug!("sampling {} chirp at {count} points over {start}..{end}", self.method);
        Ok(linspace(domain, count)
            .into_iter()
            .map(|t| (t, self.amplitude(t)))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::assert_close;

    use super::*;

    const ALL_METHODS: [SweepMethod; 5] = [
        SweepMethod::Linear,
        SweepMethod::Quadratic { vertex_zero: true },
        SweepMethod::Quadratic { vertex_zero: false },
        SweepMethod::Logarithmic,
        SweepMethod::Hyperbolic,
    ];

    #[test]
    fn test_default_chirp() {
        let chirp = Chirp::default();
        assert_eq!(chirp.amplitude(0.0), 0.0);
        assert_eq!(chirp.instantaneous_frequency(0.0), 0.0);
        assert_eq!(chirp.instantaneous_frequency(1.0), 1.0);

        for t in [0.3, 1.0, 2.5, 7.0] {
            let expected = (2.0 * PI * t * t * t / 3.0).sin();
            assert_close!(chirp.amplitude(t), expected, tol = 1e-12);
        }
    }

    #[test]
    fn test_sample_spans_domain() {
        let samples = Chirp::default().sample(0.0..=10.0, 100).unwrap();
        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0], (0.0, 0.0));
        assert_eq!(samples[99].0, 10.0);
        assert!(samples.iter().all(|(_, y)| (-1.0..=1.0).contains(y)));
    }

    #[test]
    fn test_sample_errors() {
        let chirp = Chirp::default();
        assert!(matches!(
            chirp.sample(0.0..=f64::INFINITY, 10),
            Err(Error::InvalidBounds(_, _))
        ));
        assert!(matches!(chirp.sample(0.0..=1.0, 0), Err(Error::NoData)));
    }

    #[test]
    fn test_sweep_endpoints() {
        for method in ALL_METHODS {
            let chirp = Chirp::new(2.0, 3.0, 5.0, method).unwrap();
            assert_close!(chirp.instantaneous_frequency(0.0), 2.0, tol = 1e-12, "{method}");
            assert_close!(chirp.instantaneous_frequency(3.0), 5.0, tol = 1e-12, "{method}");
            assert_close!(chirp.phase(0.0), 0.0, tol = 1e-12, "{method}");
        }
    }

    #[test]
    fn test_phase_is_integrated_frequency() {
        let h = 1e-5;
        for method in ALL_METHODS {
            let chirp = Chirp::new(2.0, 3.0, 5.0, method).unwrap();
            for t in [0.4, 1.1, 2.9, 4.0] {
                let slope = (chirp.phase(t + h) - chirp.phase(t - h)) / (2.0 * h);
                let expected = 2.0 * PI * chirp.instantaneous_frequency(t);
                assert_close!(slope, expected, tol = 1e-6 * expected.abs().max(1.0), "{method} at {t}");
            }
        }
    }

    #[test]
    fn test_constant_frequency_sweeps() {
        for method in [SweepMethod::Logarithmic, SweepMethod::Hyperbolic] {
            let chirp = Chirp::new(3.0, 1.0, 3.0, method).unwrap();
            assert_close!(chirp.phase(0.5), 2.0 * PI * 1.5, tol = 1e-12);
            assert_close!(chirp.instantaneous_frequency(0.5), 3.0, tol = 1e-12);
        }
    }

    #[test]
    fn test_phase_offset() {
        let chirp = Chirp::default().with_phase(90.0);
        assert_close!(chirp.amplitude(0.0), 1.0);
        assert_eq!(chirp.phase_degrees(), 90.0);
    }

    #[test]
    fn test_validation() {
        let invalid = [
            Chirp::new(f64::NAN, 1.0, 1.0, SweepMethod::Linear),
            Chirp::new(0.0, 0.0, 1.0, SweepMethod::Linear),
            Chirp::new(0.0, 1.0, 1.0, SweepMethod::Logarithmic),
            Chirp::new(-1.0, 1.0, 1.0, SweepMethod::Logarithmic),
            Chirp::new(0.0, 1.0, 1.0, SweepMethod::Hyperbolic),
        ];
        for result in invalid {
            assert!(matches!(result, Err(Error::InvalidChirp(_))), "{result:?}");
        }

        assert!(Chirp::new(0.0, 1.0, 1.0, SweepMethod::default()).is_ok());
    }

    #[test]
    fn test_serde() {
        let chirp: Chirp = serde_json::from_str(r#"{ "method": "linear", "f1": 4.0 }"#).unwrap();
        assert_eq!(chirp.method(), SweepMethod::Linear);
        assert_eq!(chirp.f1(), 4.0);
        assert_eq!(chirp.t1(), 1.0);

        let json = serde_json::to_string(&Chirp::default()).unwrap();
        assert!(json.contains(r#""quadratic":{"vertex_zero":true}"#), "{json}");
    }
}
