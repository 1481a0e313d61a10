use super::predictor::UsagePredictor;
use crate::domain::errors::ForecastError;
use crate::domain::ml::{FeatureBuilder, Schema};
use chrono::NaiveDateTime;
use std::fmt;

/// Frozen feature schema paired with the model fitted on it.
///
/// Both halves come from the same training run and are never mutated;
/// retraining builds a new snapshot and swaps it in whole.
pub struct ModelSnapshot {
    schema: Schema,
    model: Box<dyn UsagePredictor>,
    validation_score: f64,
}

impl ModelSnapshot {
    pub fn new(schema: Schema, model: Box<dyn UsagePredictor>, validation_score: f64) -> Self {
        Self {
            schema,
            model,
            validation_score,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn validation_score(&self) -> f64 {
        self.validation_score
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Point forecasts for `timestamps`, in input order.
    pub fn predict(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<f64>, ForecastError> {
        let table = FeatureBuilder::default().build(timestamps, Some(&self.schema));
        self.model.predict(&table.to_matrix())
    }

    pub fn predict_one(&self, timestamp: NaiveDateTime) -> Result<f64, ForecastError> {
        self.predict(&[timestamp])?
            .first()
            .copied()
            .ok_or_else(|| ForecastError::model("No prediction returned"))
    }
}

impl fmt::Debug for ModelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSnapshot")
            .field("schema", &self.schema)
            .field("model", &self.model.name())
            .field("version", &self.model.version())
            .field("validation_score", &self.validation_score)
            .finish()
    }
}
