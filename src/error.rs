//! Error types for chirp fitting and integration
//!
//! This module defines the common errors encountered when generating signals,
//! fitting polynomials, integrating them, or writing results, along with a
//! convenient `Result` alias.

/// Errors that can occur anywhere in the chirp approximation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot perform curve fitting because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// The specified basis cannot have the given number of coefficients.
    #[error("Specified basis cannot have exactly {0} coefficients")]
    InvalidNumberOfParameters(usize),

    /// Every sample shares the same x-value, so there is no domain to map onto [-1, 1].
    #[error("All samples share the same x-value; the fit domain has zero width")]
    DegenerateDomain,

    /// The input x-values are outside the valid range for this fit.
    ///
    /// Chebyshev fits are only meaningful within the sampled domain.
    /// Use `as_polynomial` to ignore these bounds if you accept extrapolation.
    #[error(
        "This fit is only stable within the x-value range {0}..{1}. Use call `as_polynomial` to ignore these bounds"
    )]
    DataRange(String, String),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// Integration bounds must both be finite.
    #[error("Integration bounds must be finite, got {0}..{1}")]
    InvalidBounds(String, String),

    /// The chirp parameters do not describe a valid sweep.
    #[error("Invalid chirp: {0}")]
    InvalidChirp(&'static str),

    /// The experiment configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a config or writing an export failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A config or export could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A figure could not be drawn.
    #[cfg(feature = "plotting")]
    #[error("Failed to draw figure: {0}")]
    Plot(String),
}

/// Result type for the chirp approximation pipeline
pub type Result<T> = std::result::Result<T, Error>;
