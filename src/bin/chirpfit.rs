use std::{path::PathBuf, process::ExitCode};

use chirpfit::{
    error::Result,
    experiment::{Experiment, ExperimentConfig},
    export::ExportData,
    report::{ReportFormat, Reporter},
    transforms::NoiseConfig,
};
use clap::Parser;

/// Fit Chebyshev polynomials to a chirp and integrate them.
///
/// With no arguments, prints the area under the degree 20, 45 and 115 fits over [0, π].
#[derive(Debug, Parser)]
#[command(name = "chirpfit", version, about)]
struct Args {
    /// JSON experiment config. Flags below override it
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Fit degrees, in order
    #[arg(long, value_delimiter = ',', value_name = "D,D,..")]
    degrees: Option<Vec<usize>>,

    /// Number of samples
    #[arg(long, value_name = "N")]
    samples: Option<usize>,

    /// First sample time
    #[arg(long, allow_hyphen_values = true)]
    domain_start: Option<f64>,

    /// Last sample time
    #[arg(long, allow_hyphen_values = true)]
    domain_end: Option<f64>,

    /// Lower integration bound
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// Upper integration bound
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// Add Gaussian noise, relative to the signal's standard deviation
    #[arg(long, value_name = "STRENGTH")]
    noise: Option<f64>,

    /// Seed for the noise
    #[arg(long, requires = "noise")]
    seed: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Export samples and fits to a .csv or .json file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Draw fits.svg and areas.svg into this directory
    #[cfg(feature = "plotting")]
    #[arg(long, value_name = "DIR")]
    plot: Option<PathBuf>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}
impl Args {
    fn config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };

        if let Some(degrees) = &self.degrees {
            config.degrees.clone_from(degrees);
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(start) = self.domain_start {
            config.domain_start = start;
        }
        if let Some(end) = self.domain_end {
            config.domain_end = end;
        }
        if let Some(lower) = self.lower {
            config.lower = lower;
        }
        if let Some(upper) = self.upper {
            config.upper = upper;
        }
        if let Some(strength) = self.noise {
            let noise = config.noise.get_or_insert_with(NoiseConfig::default);
            noise.strength = strength;
            noise.seed = self.seed.or(noise.seed);
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    let experiment = Experiment::run(&config)?;

    let stdout = std::io::stdout().lock();
    Reporter::new(stdout, args.format).write(experiment.estimates())?;

    if let Some(path) = &args.export {
        ExportData::from_experiment(&experiment).save(path)?;
    }

    #[cfg(feature = "plotting")]
    if let Some(dir) = &args.plot {
        chirpfit::plot::render(&experiment, dir)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
