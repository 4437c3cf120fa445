//! Writing the sampled signal and fitted curves to disk
//!
//! Two tables are exported:
//! - `samples`: every sample time, the signal there, and each fit's value
//! - `area`: a 50-point grid over the integration bounds, the region under each fit
//!
//! The format follows the file extension:
//! - `.json`: one document holding both tables
//! - `.csv`: the samples table at the given path, and the area table next to it as `<stem>_area.csv`.
//!   Columns are `t,signal,cheby20,cheby45,…`
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    experiment::Experiment,
    value::linspace,
};

/// Points in the grid over the integration bounds.
pub const AREA_GRID_POINTS: usize = 50;

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma separated values, with a header row.
    Csv,

    /// Pretty-printed JSON.
    Json,
}
impl ExportFormat {
    /// Picks the format from a path's extension.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for anything but `.csv` or `.json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(Error::InvalidConfig(format!(
                "unsupported export format: {} (expected .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// One row of an exported table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportRow {
    /// Time.
    pub t: f64,

    /// The noiseless chirp on the area grid, or the (possibly noisy) sample.
    pub signal: f64,

    /// Each fit's value at `t`, in degree order.
    pub fits: Vec<f64>,
}

/// The tables of an export.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportData {
    /// Fit degrees, matching the order of [`ExportRow::fits`].
    pub degrees: Vec<usize>,

    /// Integration bounds.
    pub bounds: (f64, f64),

    /// One row per sample.
    pub samples: Vec<ExportRow>,

    /// Dense grid over the integration bounds.
    pub area: Vec<ExportRow>,
}
impl ExportData {
    /// Collects the tables from a completed run.
    #[must_use]
    pub fn from_experiment(experiment: &Experiment) -> Self {
        let config = experiment.config();
        let fits = experiment.fits();

        let samples = experiment
            .samples()
            .iter()
            .map(|&(t, signal)| ExportRow {
                t,
                signal,
                fits: fits.iter().map(|f| f.as_polynomial().y(t)).collect(),
            })
            .collect();

        let area = linspace(config.lower..=config.upper, AREA_GRID_POINTS)
            .into_iter()
            .map(|t| ExportRow {
                t,
                signal: config.chirp.amplitude(t),
                fits: fits.iter().map(|f| f.as_polynomial().y(t)).collect(),
            })
            .collect();

        Self {
            degrees: fits.iter().map(|f| f.degree()).collect(),
            bounds: (config.lower, config.upper),
            samples,
            area,
        }
    }

    /// Writes the CSV header and one line per row.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if writing fails.
    pub fn write_csv(&self, rows: &[ExportRow], mut out: impl Write) -> Result<()> {
        write!(out, "t,signal")?;
        for degree in &self.degrees {
            write!(out, ",cheby{degree}")?;
        }
        writeln!(out)?;

        for row in rows {
            write!(out, "{:?},{:?}", row.t, row.signal)?;
            for y in &row.fits {
                write!(out, ",{y:?}")?;
            }
            writeln!(out)?;
        }

        out.flush()?;
        Ok(())
    }

    /// Writes both tables as one JSON document.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if writing fails.
    pub fn write_json(&self, mut out: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        Ok(())
    }

    /// Writes the export to `path`, in the format given by its extension.
    ///
    /// Returns every file written.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for an unsupported extension, or [`Error::Io`] / [`Error::Json`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        let files = match ExportFormat::from_path(path)? {
            ExportFormat::Json => {
                let file = std::fs::File::create(path)?;
                self.write_json(std::io::BufWriter::new(file))?;
                vec![path.to_path_buf()]
            }

            ExportFormat::Csv => {
                let area_path = area_csv_path(path);

                let file = std::fs::File::create(path)?;
                self.write_csv(&self.samples, std::io::BufWriter::new(file))?;

                let file = std::fs::File::create(&area_path)?;
                self.write_csv(&self.area, std::io::BufWriter::new(file))?;

                vec![path.to_path_buf(), area_path]
            }
        };

        for file in &files {
            log::info!("exported {}", file.display());
        }
        Ok(files)
    }
}

/// `dir/name.csv` becomes `dir/name_area.csv`.
fn area_csv_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_area.csv"))
}
