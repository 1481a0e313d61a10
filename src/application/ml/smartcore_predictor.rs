use super::predictor::UsagePredictor;
use crate::domain::errors::ForecastError;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest hyper-parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    /// `None` grows trees until leaves are pure
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 0,
        }
    }
}

impl ForestParams {
    fn to_smartcore(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_min_samples_split(self.min_samples_split)
            .with_seed(self.seed);
        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

pub struct SmartCorePredictor {
    model: ForestModel,
    n_features: usize,
}

impl SmartCorePredictor {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self, ForecastError> {
        let n_features = x.first().map(Vec::len).unwrap_or(0);
        if x.is_empty() || n_features == 0 {
            return Err(ForecastError::InsufficientData {
                samples: x.len(),
                required: 1,
            });
        }

        let x_matrix = DenseMatrix::from_2d_vec(&x.to_vec())
            .map_err(|e| ForecastError::model(format!("Matrix creation failed: {}", e)))?;

        debug!(
            "Fitting Random Forest (Trees: {}, Depth: {:?}, MinSplit: {}) on {}x{}",
            params.n_trees,
            params.max_depth,
            params.min_samples_split,
            x.len(),
            n_features
        );

        let model: ForestModel =
            RandomForestRegressor::fit(&x_matrix, &y.to_vec(), params.to_smartcore())
                .map_err(|e| ForecastError::model(format!("Training error: {}", e)))?;

        Ok(Self { model, n_features })
    }
}

impl UsagePredictor for SmartCorePredictor {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(row) = rows.iter().find(|r| r.len() != self.n_features) {
            return Err(ForecastError::model(format!(
                "Feature row has {} columns, model expects {}",
                row.len(),
                self.n_features
            )));
        }

        let input_matrix = DenseMatrix::from_2d_vec(&rows.to_vec())
            .map_err(|e| ForecastError::model(format!("Matrix creation failed: {}", e)))?;

        self.model
            .predict(&input_matrix)
            .map_err(|e| ForecastError::model(format!("Prediction failed: {}", e)))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let on = (i % 2) as f64;
            x.push(vec![on, 1.0 - on]);
            y.push(if on > 0.0 { 8.0 } else { 2.0 });
        }
        (x, y)
    }

    #[test]
    fn test_fit_and_predict_step_function() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_trees: 10,
            seed: 7,
            ..Default::default()
        };
        let model = SmartCorePredictor::fit(&x, &y, &params).unwrap();
        assert_eq!(model.n_features(), 2);

        let preds = model.predict(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(preds.len(), 2);
        assert!((preds[0] - 8.0).abs() < 1e-9, "got {}", preds[0]);
        assert!((preds[1] - 2.0).abs() < 1e-9, "got {}", preds[1]);
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y) = step_data();
        let model = SmartCorePredictor::fit(&x, &y, &ForestParams::default()).unwrap();
        let err = model.predict(&[vec![1.0, 0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFailure { .. }));
    }

    #[test]
    fn test_predict_empty_batch() {
        let (x, y) = step_data();
        let model = SmartCorePredictor::fit(&x, &y, &ForestParams::default()).unwrap();
        assert!(model.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        let err = SmartCorePredictor::fit(&[], &[], &ForestParams::default())
            .err()
            .unwrap();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }
}
