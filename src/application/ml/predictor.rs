use crate::domain::errors::ForecastError;

/// Interface for fitted usage regressors
pub trait UsagePredictor: Send + Sync {
    /// Predict usage for each feature row, in input order.
    /// Output is raw regression output, not clamped.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError>;

    /// Number of feature columns the model was fitted on
    fn n_features(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
