//! Rustenergy CLI
//!
//! Trains the usage model on startup (models are not persisted) and prints
//! the requested view as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use rustenergy::application::system::Application;
use rustenergy::config::Config;
use rustenergy::domain::energy::{Reading, parse_timestamp};
use rustenergy::domain::ml::FeatureCoverage;
use rustenergy::domain::ports::Clock;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Energy usage forecaster and optimization advisor", long_about = None)]
struct Cli {
    /// CSV of historical readings (timestamp,usage). Overrides TRAINING_DATA_PATH.
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Seed for the sample series, the validation split and the forest. Overrides TRAIN_SEED.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Materialize all 24 hour and 7 day columns regardless of training coverage
    #[arg(long, global = true)]
    full_calendar: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and print the validation score
    Train,

    /// Forecast hourly usage
    Predict {
        /// Number of hourly steps
        #[arg(long, default_value_t = 24)]
        hours: u32,

        /// First timestamp (defaults to now)
        #[arg(long)]
        from: Option<String>,
    },

    /// Compare one reading with the model expectation
    Insight {
        /// Measured usage in kWh
        #[arg(long)]
        usage: f64,

        /// Reading timestamp (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Service status
    Health,

    /// Current status with the forecast for the configured horizon
    Status,

    /// Optimization tips for the current reading
    Tips,
}

#[derive(Serialize)]
struct TrainReport {
    validation_score: f64,
    features: Vec<String>,
}

#[derive(Serialize)]
struct ForecastRow {
    timestamp: String,
    predicted: f64,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(input) = cli.input {
        config.model.training_data_path = Some(input);
    }
    if cli.seed.is_some() {
        config.model.seed = cli.seed;
    }
    if cli.full_calendar {
        config.model.coverage = FeatureCoverage::FullCalendar;
    }

    let app = Application::build(config)?;

    if !matches!(cli.command, Commands::Health) {
        app.train().context("Training failed")?;
    }

    match cli.command {
        Commands::Health => print_json(&app.board.service_status()),
        Commands::Train => {
            let snapshot = app.optimizer.snapshot()?;
            print_json(&TrainReport {
                validation_score: snapshot.validation_score(),
                features: snapshot.schema().columns().to_vec(),
            })
        }
        Commands::Predict { hours, from } => {
            let start = match from {
                Some(raw) => parse_timestamp(&raw)?,
                None => app.clock.now(),
            };
            let timestamps: Vec<_> = (0..hours as i64)
                .map(|h| start + Duration::hours(h))
                .collect();
            let forecast = app.optimizer.predict(&timestamps)?;
            info!("Forecast {} hours from {}", hours, start);
            let rows: Vec<ForecastRow> = timestamps
                .iter()
                .zip(forecast)
                .map(|(ts, predicted)| ForecastRow {
                    timestamp: ts.format("%Y-%m-%d %H:%M").to_string(),
                    predicted,
                })
                .collect();
            print_json(&rows)
        }
        Commands::Insight { usage, at } => {
            let reading = match at {
                Some(raw) => Reading::parse(&raw, usage)?,
                None => Reading::new(app.clock.now(), usage)?,
            };
            print_json(&app.optimizer.get_insights(&reading)?)
        }
        Commands::Status => print_json(&app.board.current_status()?),
        Commands::Tips => print_json(&app.board.optimization_tips()?),
    }
}
