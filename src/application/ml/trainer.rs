use super::predictor::UsagePredictor;
use super::smartcore_predictor::{ForestParams, SmartCorePredictor};
use super::snapshot::ModelSnapshot;
use crate::domain::energy::Reading;
use crate::domain::errors::ForecastError;
use crate::domain::ml::{FeatureBuilder, FeatureCoverage};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Smallest batch that leaves one sample on each side of the split.
const MIN_SAMPLES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    /// Share of samples held out for validation, in (0, 1)
    pub test_ratio: f64,
    /// Fixed seed for the split and the forest. Random when unset.
    pub seed: Option<u64>,
    pub coverage: FeatureCoverage,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            test_ratio: 0.2,
            seed: None,
            coverage: FeatureCoverage::Observed,
        }
    }
}

impl TrainerParams {
    fn forest(&self, seed: u64) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            seed,
        }
    }
}

/// Result of one training run.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub snapshot: ModelSnapshot,
    /// R² on the validation partition
    pub validation_score: f64,
    pub train_samples: usize,
    pub validation_samples: usize,
    /// Seed actually used, so an unseeded run can be replayed
    pub seed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    params: TrainerParams,
}

impl Trainer {
    pub fn new(params: TrainerParams) -> Self {
        Self { params }
    }

    /// Fits a model on `readings` and freezes the feature schema they produce.
    pub fn train(&self, readings: &[Reading]) -> Result<TrainingOutcome, ForecastError> {
        for reading in readings {
            reading.validate()?;
        }
        let (n_train, n_valid) = split_sizes(readings.len(), self.params.test_ratio)?;

        let timestamps: Vec<_> = readings.iter().map(|r| r.timestamp).collect();
        let table = FeatureBuilder::new(self.params.coverage).build(&timestamps, None);
        let x = table.to_matrix();
        let y: Vec<f64> = readings.iter().map(|r| r.usage).collect();

        let seed = self.params.seed.unwrap_or_else(|| rand::rng().random());
        let mut indices: Vec<usize> = (0..readings.len()).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));
        let (valid_idx, train_idx) = indices.split_at(n_valid);

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| x[i].clone()).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
        let x_valid: Vec<Vec<f64>> = valid_idx.iter().map(|&i| x[i].clone()).collect();
        let y_valid: Vec<f64> = valid_idx.iter().map(|&i| y[i]).collect();

        debug!(
            "Training on {} samples, validating on {} ({} features, seed {})",
            n_train,
            n_valid,
            table.schema.len(),
            seed
        );

        let model = SmartCorePredictor::fit(&x_train, &y_train, &self.params.forest(seed))?;
        let predictions = model.predict(&x_valid)?;
        let validation_score = r2_score(&y_valid, &predictions);

        info!(
            "Model trained: R²={:.4} (train={}, validation={}, features={}, seed={})",
            validation_score,
            n_train,
            n_valid,
            table.schema.len(),
            seed
        );

        Ok(TrainingOutcome {
            snapshot: ModelSnapshot::new(table.schema, Box::new(model), validation_score),
            validation_score,
            train_samples: n_train,
            validation_samples: n_valid,
            seed,
        })
    }
}

/// Returns `(train, validation)` sizes; the validation side is rounded up.
pub fn split_sizes(samples: usize, test_ratio: f64) -> Result<(usize, usize), ForecastError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ForecastError::model(format!(
            "test ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }
    let n_valid = (samples as f64 * test_ratio).ceil() as usize;
    if samples < MIN_SAMPLES || n_valid == 0 || n_valid >= samples {
        return Err(ForecastError::InsufficientData {
            samples,
            required: MIN_SAMPLES,
        });
    }
    Ok((samples - n_valid, n_valid))
}

/// Coefficient of determination. Constant targets score 1.0 when matched
/// exactly and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    if n == 0 {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / n as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Two days of readings: 8 kWh in the evening, 2 kWh otherwise.
    fn evening_pattern() -> Vec<Reading> {
        (0..48)
            .map(|h| {
                let ts = start() + Duration::hours(h);
                let usage = if (17..=20).contains(&(h % 24)) { 8.0 } else { 2.0 };
                Reading::new(ts, usage).unwrap()
            })
            .collect()
    }

    fn seeded() -> Trainer {
        Trainer::new(TrainerParams {
            n_trees: 20,
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn test_split_sizes() {
        assert_eq!(split_sizes(168, 0.2).unwrap(), (134, 34));
        assert_eq!(split_sizes(10, 0.2).unwrap(), (8, 2));
        assert_eq!(split_sizes(2, 0.2).unwrap(), (1, 1));
        assert!(matches!(
            split_sizes(1, 0.2),
            Err(ForecastError::InsufficientData { samples: 1, .. })
        ));
        assert!(split_sizes(100, 0.0).is_err());
        assert!(split_sizes(100, 1.0).is_err());
    }

    #[test]
    fn test_r2_score() {
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]), 0.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 4.0]), 1.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[3.0, 4.0]), 0.0);
    }

    #[test]
    fn test_train_freezes_schema_and_counts() {
        let outcome = seeded().train(&evening_pattern()).unwrap();
        assert_eq!(outcome.train_samples + outcome.validation_samples, 48);
        assert_eq!(outcome.validation_samples, 10);
        assert_eq!(outcome.seed, 42);
        // 24 hours, Monday + Tuesday, weekend flag
        assert_eq!(outcome.snapshot.schema().len(), 24 + 2 + 1);
        assert!(outcome.validation_score.is_finite());
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let data = evening_pattern();
        let a = seeded().train(&data).unwrap();
        let b = seeded().train(&data).unwrap();
        assert_eq!(a.validation_score, b.validation_score);

        let probe = [start() + Duration::hours(72 + 18)];
        assert_eq!(
            a.snapshot.predict(&probe).unwrap(),
            b.snapshot.predict(&probe).unwrap()
        );
    }

    #[test]
    fn test_train_rejects_negative_usage() {
        let mut data = evening_pattern();
        data[5].usage = -1.0;
        let err = seeded().train(&data).unwrap_err();
        assert!(matches!(err, ForecastError::MalformedReading { .. }));
    }

    #[test]
    fn test_train_rejects_single_reading() {
        let data = &evening_pattern()[..1];
        assert!(matches!(
            seeded().train(data),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}
