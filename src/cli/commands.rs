use super::render;
use crate::aqi::{level_label, Classifier};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{group_forecasts, group_summaries, MeasurementSummary, Pollutant};
use crate::pipeline::{rank_rows, summarise, summarise_samples};
use crate::source::{
    load_forecasts, load_measurement_summaries, load_samples, MockDataProvider,
};
use chrono::{DateTime, Duration, DurationRound, Utc};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Compare air quality forecasts against ground-truth measurements
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank locations by their largest forecast-vs-measurement deviation
    Compare(CompareArgs),

    /// Bucket raw samples into hourly averages
    Bucket(BucketArgs),

    /// Classify a single concentration
    Classify(ClassifyArgs),

    /// Run the comparison on generated data
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// JSON array of forecast records
    #[arg(short, long)]
    pub forecasts: PathBuf,

    /// JSON array of averaged measurement records
    #[arg(short, long, conflicts_with = "samples")]
    pub measurements: Option<PathBuf>,

    /// JSON array of raw measurement samples (bucketed before comparing)
    #[arg(short, long, requires = "base_time")]
    pub samples: Option<PathBuf>,

    /// Forecast base time anchoring the hourly buckets (RFC 3339)
    #[arg(short, long)]
    pub base_time: Option<DateTime<Utc>>,

    /// Least divergent locations first
    #[arg(long)]
    pub ascending: bool,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BucketArgs {
    /// JSON array of raw measurement samples
    #[arg(short, long)]
    pub samples: PathBuf,

    /// Forecast base time anchoring the hourly buckets (RFC 3339)
    #[arg(short, long)]
    pub base_time: DateTime<Utc>,

    /// Only show this location
    #[arg(short, long)]
    pub location: Option<String>,

    /// Print averages as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Pollutant key (pm2_5, pm10, no2, o3, so2)
    #[arg(short, long, value_parser = parse_pollutant)]
    pub pollutant: Pollutant,

    /// Concentration in µg/m³
    #[arg(short, long, allow_negative_numbers = true)]
    pub value: f64,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of locations to generate
    #[arg(short, long, default_value = "4")]
    pub locations: usize,

    /// Forecast hours per location
    #[arg(long, default_value = "24")]
    pub hours: u32,

    /// Seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Least divergent locations first
    #[arg(long)]
    pub ascending: bool,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_pollutant(raw: &str) -> std::result::Result<Pollutant, String> {
    raw.parse::<Pollutant>().map_err(|e| e.to_string())
}

/// CLI application
pub struct App {
    config: Config,
    classifier: Classifier,
}

impl App {
    /// Create a new CLI application from loaded configuration
    pub fn new(config: Config) -> Result<Self> {
        let classifier = config.classifier()?;
        Ok(Self { config, classifier })
    }

    /// Run a single command
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Compare(args) => self.compare(args).await,
            Commands::Bucket(args) => self.bucket(args).await,
            Commands::Classify(args) => {
                println!("{}", self.classify(args.pollutant, args.value));
                Ok(())
            },
            Commands::Demo(args) => self.demo(args),
        }
    }

    fn descending(&self, ascending: bool) -> bool {
        !ascending && self.config.descending
    }

    /// Compare forecast and measurement files
    async fn compare(&self, args: CompareArgs) -> Result<()> {
        let spinner = spinner("Loading input files...")?;

        let forecasts = group_forecasts(load_forecasts(&args.forecasts).await?);
        let measurements: BTreeMap<String, Vec<MeasurementSummary>> =
            match (&args.measurements, &args.samples, args.base_time) {
                (Some(path), _, _) => group_summaries(load_measurement_summaries(path).await?),
                (None, Some(path), Some(base_time)) => {
                    summarise_samples(&load_samples(path).await?, base_time, &self.classifier)
                },
                (None, Some(_), None) => {
                    return Err(AppError::Cli(
                        "--samples requires --base-time to anchor the buckets".to_string(),
                    ));
                },
                (None, None, _) => {
                    warn!("No measurements supplied; producing forecast-only rows");
                    BTreeMap::new()
                },
            };

        spinner.set_message("Comparing...");
        let mut rows = summarise(&forecasts, &measurements);
        rank_rows(&mut rows, self.descending(args.ascending));
        spinner.finish_and_clear();

        info!("Compared {} locations", rows.len());
        if args.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            println!("{}", "Forecast vs measurements".cyan().bold());
            println!("{}", render::summary_table(&rows));
        }
        Ok(())
    }

    /// Bucket raw samples and print hourly averages
    async fn bucket(&self, args: BucketArgs) -> Result<()> {
        let mut samples = load_samples(&args.samples).await?;
        if let Some(location) = &args.location {
            samples.retain(|s| &s.location_name == location);
            if samples.is_empty() {
                return Err(AppError::Cli(format!("No samples for location '{}'", location)));
            }
        }

        let summaries = summarise_samples(&samples, args.base_time, &self.classifier);
        info!("Averaged samples for {} locations", summaries.len());

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            return Ok(());
        }
        for (location, series) in &summaries {
            println!("{}", location.cyan().bold());
            println!("{}", render::bucket_table(series));
        }
        Ok(())
    }

    /// Describe the AQI level of one concentration
    pub fn classify(&self, pollutant: Pollutant, value: f64) -> String {
        let level = self.classifier.classify(Some(value), pollutant);
        format!(
            "{} {} µg/m³ -> AQI level {} ({})",
            pollutant.display_name(),
            value,
            level,
            level_label(level)
        )
    }

    /// Generate data and run the full pipeline on it
    fn demo(&self, args: DemoArgs) -> Result<()> {
        let base_time = Utc::now()
            .duration_trunc(Duration::hours(1))
            .map_err(|e| AppError::Cli(format!("Cannot truncate current time: {}", e)))?;
        let mut provider = match args.seed {
            Some(seed) => MockDataProvider::with_seed(seed, self.classifier.clone()),
            None => MockDataProvider::new(self.classifier.clone()),
        };

        let available = MockDataProvider::location_names();
        if args.locations > available.len() {
            warn!(
                "Only {} demo locations exist ({}); generating all of them",
                available.len(),
                available.join(", ")
            );
        }

        let spinner = spinner("Generating data...")?;
        let data = provider.generate(base_time, args.locations, args.hours);
        info!(
            "Generated {} forecasts and {} samples from {}",
            data.forecasts.len(),
            data.samples.len(),
            data.base_time
        );

        spinner.set_message("Comparing...");
        let forecasts = group_forecasts(data.forecasts);
        let measurements = summarise_samples(&data.samples, data.base_time, &self.classifier);
        let mut rows = summarise(&forecasts, &measurements);
        rank_rows(&mut rows, self.descending(args.ascending));
        spinner.finish_and_clear();

        if args.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            println!("{}", "Demo: forecast vs measurements".cyan().bold());
            println!("{}", render::summary_table(&rows));
        }
        Ok(())
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}
