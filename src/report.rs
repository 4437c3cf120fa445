//! Emitting area estimates
//!
//! The text format prints one line per degree:
//! ```text
//! The area of cheby20 in this interval is 0.4939015180935553. The absolute error is 1.0826196006009968e-9
//! ```
//! Floats use the shortest representation that round-trips, in scientific notation
//! below `1e-4` and from `1e16` up.
//!
//! The JSON format emits the full [`AreaEstimate`]s, including fit properties and
//! quadrature diagnostics.
use std::io::Write;

use crate::{error::Result, experiment::AreaEstimate};

/// Output format for a [`Reporter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// One sentence per degree.
    #[default]
    Text,

    /// Pretty-printed JSON array of estimates.
    Json,
}

/// Formats the text report line for one estimate.
///
/// ```rust
/// # use chirpfit::report::format_line;
/// assert_eq!(
///     format_line(20, 0.5, 1e-10),
///     "The area of cheby20 in this interval is 0.5. The absolute error is 1e-10"
/// );
/// ```
#[must_use]
pub fn format_line(degree: usize, area: f64, abs_error: f64) -> String {
    format!("The area of cheby{degree} in this interval is {area:?}. The absolute error is {abs_error:?}")
}

/// Writes area estimates to any [`Write`] sink.
pub struct Reporter<W: Write> {
    out: W,
    format: ReportFormat,
}
impl<W: Write> Reporter<W> {
    /// Creates a reporter writing `format` to `out`.
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    /// Writes every estimate, in order.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Io`] or [`crate::error::Error::Json`] if writing fails.
    pub fn write(&mut self, estimates: &[AreaEstimate]) -> Result<()> {
        match self.format {
            ReportFormat::Text => {
                for estimate in estimates {
                    let line = format_line(
                        estimate.degree,
                        estimate.integral.value,
                        estimate.integral.abs_error,
                    );
                    writeln!(self.out, "{line}")?;
                }
            }

            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, estimates)?;
                writeln!(self.out)?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
