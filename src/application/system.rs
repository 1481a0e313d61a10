use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::insights::InsightEngine;
use crate::application::ml::Trainer;
use crate::application::optimizer::EnergyOptimizer;
use crate::application::status::StatusBoard;
use crate::config::Config;
use crate::domain::ports::{Clock, LiveReadingSource, ReadingSource};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::csv_source::CsvReadingSource;
use crate::infrastructure::meter::SimulatedMeter;
use crate::infrastructure::simulation::SampleDataGenerator;

/// Wired-up services for one process.
pub struct Application {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub optimizer: Arc<EnergyOptimizer>,
    pub board: Arc<StatusBoard>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self> {
        Self::build_with_clock(config, Arc::new(SystemClock))
    }

    pub fn build_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let source: Arc<dyn ReadingSource> = match &config.model.training_data_path {
            Some(path) => {
                info!("Training source: CSV file {:?}", path);
                Arc::new(CsvReadingSource::new(path.clone()))
            }
            None => {
                info!(
                    "Training source: {}-day sample series (noise std {})",
                    config.simulation.sample_days, config.simulation.sample_noise_std
                );
                Arc::new(SampleDataGenerator::new(
                    config.simulation.sample_days,
                    config.simulation.sample_noise_std,
                    config.model.seed,
                    clock.clone(),
                ))
            }
        };

        let optimizer = Arc::new(EnergyOptimizer::new(
            Trainer::new(config.model.trainer_params()),
            InsightEngine::new(config.insight.rules(), clock.clone()),
            source,
        ));

        let meter: Arc<dyn LiveReadingSource> = Arc::new(SimulatedMeter::new(
            config.simulation.simulated_usage,
            clock.clone(),
        ));

        let board = Arc::new(StatusBoard::new(
            optimizer.clone(),
            meter,
            clock.clone(),
            config.insight.forecast_horizon_hours,
            config.insight.optimal_usage_factor,
        ));

        Ok(Self {
            config,
            clock,
            optimizer,
            board,
        })
    }

    /// Trains on the configured source and returns the validation R².
    pub fn train(&self) -> Result<f64> {
        info!("Training usage model ({:?} coverage)...", self.config.model.coverage);
        let score = self.optimizer.train(None)?;
        info!("Model ready. Validation R²={:.4}", score);
        Ok(score)
    }
}
