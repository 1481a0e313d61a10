//! Rustenergy Server - Headless energy advisor
//!
//! Trains the usage model at startup and pushes the current status as
//! structured JSON to stdout on an interval.
//!
//! # Usage
//! ```sh
//! OBSERVABILITY_INTERVAL=60 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `OBSERVABILITY_ENABLED` - Enable status reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between status outputs (default: 60)
//! - `TRAINING_DATA_PATH` - CSV of historical readings (default: generated sample week)

use anyhow::Result;
use rustenergy::application::system::Application;
use rustenergy::config::Config;
use rustenergy::infrastructure::observability::StatusReporter;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Rustenergy Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Trees={}, Coverage={:?}, Peak={}..={}",
        config.model.n_trees,
        config.model.coverage,
        config.insight.peak_start_hour,
        config.insight.peak_end_hour
    );

    let app = Application::build(config.clone())?;
    app.train()?;

    if config.observability.enabled {
        let reporter = StatusReporter::new(app.board.clone(), config.observability.interval_seconds);

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!(
            "Status reporter started (interval: {}s)",
            config.observability.interval_seconds
        );
    } else {
        info!("Status reporting disabled.");
    }

    info!("Server running. Press Ctrl+C to shutdown.");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting...");

    Ok(())
}
