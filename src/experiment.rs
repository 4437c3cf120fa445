//! The chirp approximation pipeline
//!
//! [`Experiment::run`] takes an [`ExperimentConfig`] through every stage:
//! 1. Sample the [`Chirp`] over the domain
//! 2. Optionally perturb the samples with seeded noise
//! 3. Fit a [`ChebyshevFit`] for each configured degree, in order
//! 4. Integrate each fit over the bounds, and compute its exact area from the antiderivative
//!
//! The run fails fast on the first error. Numerical warnings (rank deficient fits,
//! unconverged integrals) are logged and do not stop it.
//!
//! ```rust
//! use chirpfit::experiment::{Experiment, ExperimentConfig};
//!
//! let experiment = Experiment::run(&ExperimentConfig::default()).unwrap();
//! assert_eq!(experiment.samples().len(), 100);
//! assert_eq!(experiment.estimates().len(), 3);
//! ```
use std::path::Path;

use crate::{
    error::{Error, Result},
    quadrature::{Integral, QuadratureOptions},
    signal::Chirp,
    transforms::NoiseConfig,
    ChebyshevFit, FitProperties,
};

/// Everything needed to reproduce a run.
///
/// `Default` is a quadratic chirp sampled 100 times over `[0, 10]`, fit at degrees
/// 20, 45 and 115, and integrated over `[0, π]`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// First sample time.
    pub domain_start: f64,

    /// Last sample time.
    pub domain_end: f64,

    /// Number of evenly spaced samples, endpoints included.
    pub samples: usize,

    /// The signal being approximated.
    pub chirp: Chirp,

    /// Fit degrees, processed in this order.
    pub degrees: Vec<usize>,

    /// Lower integration bound.
    pub lower: f64,

    /// Upper integration bound.
    pub upper: f64,

    /// Quadrature tolerances.
    pub quadrature: QuadratureOptions,

    /// Optional noise added to the samples before fitting.
    pub noise: Option<NoiseConfig>,
}
impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            domain_start: 0.0,
            domain_end: 10.0,
            samples: 100,
            chirp: Chirp::default(),
            degrees: vec![20, 45, 115],
            lower: 0.0,
            upper: std::f64::consts::PI,
            quadrature: QuadratureOptions::default(),
            noise: None,
        }
    }
}
impl ExperimentConfig {
    /// Parses a config from JSON. Missing fields take their default values.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if the document is malformed, or the validation error.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read, or any error from [`ExperimentConfig::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks the config describes a runnable experiment.
    ///
    /// # Errors
    /// - [`Error::InvalidConfig`] for an empty degree list, zero samples, or a non-finite domain or bound.
    /// - [`Error::InvalidChirp`] / [`Error::InvalidConfig`] from the chirp and quadrature settings.
    pub fn validate(&self) -> Result<()> {
        if self.degrees.is_empty() {
            return Err(Error::InvalidConfig("at least one degree is required".into()));
        }
        if self.samples == 0 {
            return Err(Error::InvalidConfig("sample count must be at least 1".into()));
        }

        let ends = [self.domain_start, self.domain_end, self.lower, self.upper];
        if !ends.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "domain {}..{} and bounds {}..{} must be finite",
                self.domain_start, self.domain_end, self.lower, self.upper
            )));
        }

        self.chirp.validate()?;
        self.quadrature.validate()
    }
}

/// One degree's result: the quadrature estimate, the exact area, and how good the fit was.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AreaEstimate {
    /// Degree of the fit.
    pub degree: usize,

    /// Integration bounds.
    pub bounds: (f64, f64),

    /// Adaptive quadrature result.
    pub integral: Integral,

    /// Area from the analytic antiderivative of the fit.
    pub exact_area: f64,

    /// Fit diagnostics.
    pub fit: FitProperties<f64>,
}
impl AreaEstimate {
    /// Difference between the quadrature estimate and the exact area.
    #[must_use]
    pub fn discrepancy(&self) -> f64 {
        (self.integral.value - self.exact_area).abs()
    }
}

/// A completed run.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    samples: Vec<(f64, f64)>,
    fits: Vec<ChebyshevFit<'static>>,
    estimates: Vec<AreaEstimate>,
}
impl Experiment {
    /// Runs the full pipeline.
    ///
    /// # Errors
    /// Returns the first error from validation, sampling, noise, fitting or integration.
    pub fn run(config: &ExperimentConfig) -> Result<Self> {
        config.validate()?;

        log::info!(
            "sampling {} points over {}..{}",
            config.samples,
            config.domain_start,
            config.domain_end
        );
        let mut samples = config
            .chirp
            .sample(config.domain_start..=config.domain_end, config.samples)?;

        if let Some(noise) = &config.noise {
            log::info!(
                "adding noise: strength {}, rho {}, seed {:?}",
                noise.strength,
                noise.rho,
                noise.seed
            );
            samples = noise.apply(samples)?;
        }

        let mut fits = Vec::with_capacity(config.degrees.len());
        let mut estimates = Vec::with_capacity(config.degrees.len());
        for &degree in &config.degrees {
            log::info!("fitting degree {degree}");
            let fit = ChebyshevFit::new(samples.clone(), degree)?;

            let integral = fit.integrate(config.lower, config.upper, &config.quadrature)?;
            let exact_area = fit.area_under_curve(config.lower, config.upper)?;

            let estimate = AreaEstimate {
                degree,
                bounds: (config.lower, config.upper),
                integral,
                exact_area,
                fit: fit.properties(),
            };
            log::info!(
                "degree {degree}: area {:?} ± {:e}, exact {:?}",
                integral.value,
                integral.abs_error,
                exact_area
            );
            if estimate.discrepancy() > integral.abs_error.max(1e-9 * exact_area.abs().max(1.0)) {
                log::warn!(
                    "degree {degree}: quadrature and exact area differ by {:e}, more than the error estimate",
                    estimate.discrepancy()
                );
            }

            fits.push(fit);
            estimates.push(estimate);
        }

        Ok(Self {
            config: config.clone(),
            samples,
            fits,
            estimates,
        })
    }

    /// The config this run used.
    #[must_use]
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The (possibly noisy) samples every degree was fit to.
    #[must_use]
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// One fit per configured degree, in order.
    #[must_use]
    pub fn fits(&self) -> &[ChebyshevFit<'static>] {
        &self.fits
    }

    /// One estimate per configured degree, in order.
    #[must_use]
    pub fn estimates(&self) -> &[AreaEstimate] {
        &self.estimates
    }

    /// Consumes the run, keeping only the estimates.
    #[must_use]
    pub fn into_estimates(self) -> Vec<AreaEstimate> {
        self.estimates
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_close, quadrature::QuadratureStatus};

    use super::*;

    #[test]
    fn test_default_run() {
        let experiment = Experiment::run(&ExperimentConfig::default()).unwrap();

        let samples = experiment.samples();
        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0], (0.0, 0.0));
        assert_eq!(samples[99].0, 10.0);

        let degrees: Vec<_> = experiment.estimates().iter().map(|e| e.degree).collect();
        assert_eq!(degrees, vec![20, 45, 115]);

        for estimate in experiment.estimates() {
            assert!(estimate.integral.value.is_finite());
            assert!(estimate.integral.abs_error >= 0.0);
            assert!(estimate.exact_area.is_finite());
            assert_eq!(estimate.bounds, (0.0, std::f64::consts::PI));
        }

        let fits = experiment.fits();
        assert_eq!(fits.len(), 3);
        assert!(!fits[0].is_rank_deficient());
        assert!(fits[2].is_rank_deficient());
    }

    #[test]
    fn test_degrees_in_order() {
        let config = ExperimentConfig {
            degrees: vec![5, 3],
            domain_end: 1.0,
            samples: 30,
            upper: 1.0,
            ..ExperimentConfig::default()
        };
        let experiment = Experiment::run(&config).unwrap();
        let degrees: Vec<_> = experiment.into_estimates().iter().map(|e| e.degree).collect();
        assert_eq!(degrees, vec![5, 3]);
    }

    #[test]
    fn test_quadrature_matches_exact_area() {
        // Over [0, 1] the default chirp is smooth, so the fit is well conditioned
        let config = ExperimentConfig {
            domain_end: 1.0,
            samples: 50,
            degrees: vec![10],
            upper: 1.0,
            ..ExperimentConfig::default()
        };
        let experiment = Experiment::run(&config).unwrap();
        let estimate = &experiment.estimates()[0];

        assert_eq!(estimate.integral.status, QuadratureStatus::Converged);
        assert!(estimate.discrepancy() <= estimate.integral.abs_error + 1e-12);
        assert!(estimate.fit.r_squared > 0.999);
    }

    #[test]
    fn test_noise_is_reproducible() {
        let config = ExperimentConfig {
            degrees: vec![20],
            noise: Some(NoiseConfig {
                strength: 0.05,
                rho: 0.0,
                seed: Some(3),
            }),
            ..ExperimentConfig::default()
        };

        let a = Experiment::run(&config).unwrap();
        let b = Experiment::run(&config).unwrap();
        assert_eq!(a.samples(), b.samples());
        assert_eq!(a.estimates(), b.estimates());

        let clean = Experiment::run(&ExperimentConfig {
            noise: None,
            ..config
        })
        .unwrap();
        assert_ne!(a.samples(), clean.samples());
    }

    #[test]
    fn test_validate() {
        let bad = [
            ExperimentConfig {
                degrees: vec![],
                ..ExperimentConfig::default()
            },
            ExperimentConfig {
                samples: 0,
                ..ExperimentConfig::default()
            },
            ExperimentConfig {
                upper: f64::INFINITY,
                ..ExperimentConfig::default()
            },
            ExperimentConfig {
                domain_start: f64::NAN,
                ..ExperimentConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                Experiment::run(&config),
                Err(Error::InvalidConfig(_))
            ));
        }

        let degenerate = ExperimentConfig {
            samples: 1,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            Experiment::run(&degenerate),
            Err(Error::DegenerateDomain)
        ));
    }

    #[test]
    fn test_config_json() {
        let config = ExperimentConfig::from_json(r#"{ "degrees": [4, 8], "upper": 2.0 }"#).unwrap();
        assert_eq!(config.degrees, vec![4, 8]);
        assert_close!(config.upper, 2.0);
        assert_eq!(config.samples, 100);
        assert_eq!(config.chirp, Chirp::default());
        assert!(config.noise.is_none());

        let json = serde_json::to_string(&ExperimentConfig::default()).unwrap();
        let parsed = ExperimentConfig::from_json(&json).unwrap();
        assert_eq!(parsed.degrees, vec![20, 45, 115]);
        assert_eq!(parsed.quadrature.limit, 50);
        assert_close!(parsed.upper, std::f64::consts::PI, tol = 1e-15);

        assert!(matches!(
            ExperimentConfig::from_json(r#"{ "samples": "many" }"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            ExperimentConfig::from_json(r#"{ "degrees": [] }"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ExperimentConfig::load("/nonexistent/chirpfit.json"),
            Err(Error::Io(_))
        ));
    }
}
