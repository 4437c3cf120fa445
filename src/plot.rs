//! SVG figures of a run, using the `plotters` crate
//!
//! Two figures are drawn, with one panel per fit degree:
//! - `fits.svg`: the samples as stems, and the fitted curve over the sample domain
//! - `areas.svg`: the same, with the area under the fit shaded between the integration bounds
//!
//! Curves are clipped to the sample range padded by half its height, so a wild
//! high-degree fit cannot flatten the samples.
use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::prelude::*;

use crate::{
    error::{Error, Result},
    experiment::Experiment,
    value::{linspace, CoordExt},
    ChebyshevFit,
};

/// Pixel size of one panel.
pub const PANEL_SIZE: (u32, u32) = (900, 300);

/// Points used to draw each fitted curve.
const CURVE_POINTS: usize = 1000;

/// Points used to draw each shaded area.
const AREA_POINTS: usize = 200;

fn plot_error(e: impl std::fmt::Display) -> Error {
    Error::Plot(e.to_string())
}

/// Draws `fits.svg` and `areas.svg` into `dir`, creating it if needed.
///
/// Returns the paths written.
///
/// # Errors
/// Returns [`Error::Io`] if `dir` cannot be created, or [`Error::Plot`] if drawing fails.
pub fn render(experiment: &Experiment, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let fits_path = dir.join("fits.svg");
    draw_figure(&fits_path, experiment, false)?;

    let areas_path = dir.join("areas.svg");
    draw_figure(&areas_path, experiment, true)?;

    for path in [&fits_path, &areas_path] {
        log::info!("plotted {}", path.display());
    }
    Ok(vec![fits_path, areas_path])
}

fn draw_figure(path: &Path, experiment: &Experiment, shade_area: bool) -> Result<()> {
    let fits = experiment.fits();
    let samples = experiment.samples();
    let panels = u32::try_from(fits.len()).map_err(plot_error)?;

    let size = (PANEL_SIZE.0, PANEL_SIZE.1 * panels.max(1));
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let x_range = samples.x_range().ok_or(Error::NoData)?;
    let x_range = *x_range.start()..*x_range.end();
    let y_range = padded_y_range(samples)?;
    let bounds = experiment.config().lower..experiment.config().upper;

    let areas = root.split_evenly((fits.len(), 1));
    for (area, fit) in areas.iter().zip(fits) {
        let title = format!("cheby{}", fit.degree());
        let shade = shade_area.then(|| bounds.clone());
        draw_panel(area, &title, samples, fit, x_range.clone(), y_range.clone(), shade)?;
    }

    root.present().map_err(plot_error)?;
    Ok(())
}

fn padded_y_range(samples: &[(f64, f64)]) -> Result<Range<f64>> {
    let y_range = samples.y_range().ok_or(Error::NoData)?;
    let (min, max) = (*y_range.start(), *y_range.end());
    let pad = if max > min { 0.5 * (max - min) } else { 1.0 };
    Ok(min - pad..max + pad)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    samples: &[(f64, f64)],
    fit: &ChebyshevFit<'static>,
    x_range: Range<f64>,
    y_range: Range<f64>,
    shade: Option<Range<f64>>,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 16))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .draw()
        .map_err(plot_error)?;

    let clip = |y: f64| y.clamp(y_range.start, y_range.end);
    let function = fit.as_polynomial();

    if let Some(bounds) = shade {
        let region = function
            .solve_linspace(bounds.start..=bounds.end, AREA_POINTS)
            .into_iter()
            .map(|(x, y)| (x, clip(y)));
        chart
            .draw_series(AreaSeries::new(region, 0.0, GREEN.mix(0.3)))
            .map_err(plot_error)?;
    }

    let stem_style = ShapeStyle::from(&BLUE.mix(0.6)).stroke_width(1);
    chart
        .draw_series(
            samples
                .iter()
                .map(|&(t, y)| PathElement::new(vec![(t, 0.0), (t, y)], stem_style)),
        )
        .map_err(plot_error)?;
    chart
        .draw_series(
            samples
                .iter()
                .map(|&(t, y)| Circle::new((t, y), 2, BLUE.filled())),
        )
        .map_err(plot_error)?;

    let curve = linspace(x_range.start..=x_range.end, CURVE_POINTS)
        .into_iter()
        .map(|x| (x, clip(function.y(x))));
    chart
        .draw_series(LineSeries::new(curve, RED.stroke_width(2)))
        .map_err(plot_error)?;

    Ok(())
}
