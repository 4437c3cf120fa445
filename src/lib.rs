//! # Chirpfit
//! ## How much area is under a chirp, according to a polynomial?
//!
//! A quadratic chirp (a sinusoid whose frequency rises with the square of time) is sampled,
//! approximated by Chebyshev polynomials of increasing degree, and each approximation is
//! integrated over a fixed interval with adaptive quadrature. The interesting part is how the
//! area and its error estimate move as the degree goes up.
//!
//! ```rust
//! use chirpfit::{signal::Chirp, quadrature::QuadratureOptions, ChebyshevFit};
//!
//! let samples = Chirp::default().sample(0.0..=10.0, 100).unwrap();
//! let fit = ChebyshevFit::new(&samples, 20).unwrap();
//!
//! let area = fit.integrate(0.0, std::f64::consts::PI, &QuadratureOptions::default()).unwrap();
//! println!("The area of cheby20 in this interval is {:?}. The absolute error is {:?}", area.value, area.abs_error);
//! ```
//!
//! # Core Concepts
//! - A [`signal::Chirp`] generates the `(t, amplitude)` samples.
//! - A [`CurveFit`] is a least-squares fit to those samples. [`ChebyshevFit`] is the Chebyshev flavour.
//!     - It is only valid within the `x` range of the samples; [`CurveFit::y`] refuses to extrapolate.
//!     - A degree above the sample count is underdetermined: the minimum-norm fit is returned and
//!       [`CurveFit::rank`] reports how much of it the data actually pinned down.
//! - A [`Polynomial`] is the fitted function itself, evaluable anywhere.
//! - [`quadrature::integrate`] estimates a definite integral and its absolute error.
//!     - [`Polynomial::area_under_curve`] gives the exact area from the Chebyshev antiderivative, as a cross-check.
//! - [`experiment::Experiment`] runs the whole pipeline from an [`experiment::ExperimentConfig`],
//!   and [`report::Reporter`] prints the results.
//!
//! # Implementation Details
//!
//! Fitting uses `nalgebra`'s SVD on a column-scaled Chebyshev Vandermonde matrix, and never
//! converts coefficients to the monomial basis. Logging goes through the `log` facade.
//!
//! # Testing utilities
//!
//! This crate includes a set of assertion macros for floats and fits. See [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]


#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plot;

pub mod basis;
pub mod error;
pub mod experiment;
pub mod export;
pub mod quadrature;
pub mod report;
pub mod signal;
pub mod statistics;
pub mod transforms;
pub mod value;

mod fit;
mod polynomial;

pub use fit::*;
pub use polynomial::Polynomial;

pub use nalgebra;
