use crate::application::insights::InsightEngine;
use crate::application::ml::{ModelSnapshot, Trainer};
use crate::domain::energy::{Insight, Reading};
use crate::domain::errors::ForecastError;
use crate::domain::ports::ReadingSource;
use chrono::NaiveDateTime;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Energy usage forecaster and advisor.
///
/// Holds the current [`ModelSnapshot`] behind a lock that is only written by
/// [`EnergyOptimizer::train`]. Readers clone the `Arc` and work on a snapshot
/// that can never mix a schema from one run with a model from another.
pub struct EnergyOptimizer {
    trainer: Trainer,
    engine: InsightEngine,
    default_source: Arc<dyn ReadingSource>,
    state: RwLock<Option<Arc<ModelSnapshot>>>,
}

impl EnergyOptimizer {
    pub fn new(
        trainer: Trainer,
        engine: InsightEngine,
        default_source: Arc<dyn ReadingSource>,
    ) -> Self {
        Self {
            trainer,
            engine,
            default_source,
            state: RwLock::new(None),
        }
    }

    /// Trains on `data`, or on the default source when `None`, and swaps in
    /// the new snapshot. Returns the validation R².
    pub fn train(&self, data: Option<&[Reading]>) -> Result<f64, ForecastError> {
        let outcome = match data {
            Some(readings) => self.trainer.train(readings)?,
            None => {
                let readings = self.default_source.history()?;
                info!(
                    "Training on {} readings from {}",
                    readings.len(),
                    self.default_source.name()
                );
                self.trainer.train(&readings)?
            }
        };

        let score = outcome.validation_score;
        let mut state = self
            .state
            .write()
            .map_err(|_| ForecastError::StateUnavailable)?;
        *state = Some(Arc::new(outcome.snapshot));
        Ok(score)
    }

    /// Current snapshot, or `SchemaNotReady` before the first training.
    pub fn snapshot(&self) -> Result<Arc<ModelSnapshot>, ForecastError> {
        self.state
            .read()
            .map_err(|_| ForecastError::StateUnavailable)?
            .clone()
            .ok_or(ForecastError::SchemaNotReady)
    }

    pub fn is_trained(&self) -> bool {
        self.snapshot().is_ok()
    }

    pub fn predict(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<f64>, ForecastError> {
        self.snapshot()?.predict(timestamps)
    }

    pub fn get_insights(&self, reading: &Reading) -> Result<Insight, ForecastError> {
        let snapshot = self.snapshot()?;
        self.engine.insights(&snapshot, reading)
    }
}
