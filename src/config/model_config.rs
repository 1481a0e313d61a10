//! Model training configuration parsing from environment variables.

use super::{env_optional, env_value};
use crate::application::ml::TrainerParams;
use crate::domain::ml::FeatureCoverage;
use anyhow::{Result, ensure};
use std::path::PathBuf;

/// Random forest and training-split configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub test_ratio: f64,
    pub seed: Option<u64>,
    pub coverage: FeatureCoverage,
    /// CSV of historical readings; the sample generator is used when unset
    pub training_data_path: Option<PathBuf>,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            test_ratio: 0.2,
            seed: None,
            coverage: FeatureCoverage::Observed,
            training_data_path: None,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            n_trees: env_value("RF_N_TREES", defaults.n_trees)?,
            max_depth: env_optional("RF_MAX_DEPTH")?,
            min_samples_split: env_value("RF_MIN_SAMPLES_SPLIT", defaults.min_samples_split)?,
            test_ratio: env_value("TRAIN_TEST_RATIO", defaults.test_ratio)?,
            seed: env_optional("TRAIN_SEED")?,
            coverage: env_value("FEATURE_COVERAGE", defaults.coverage)?,
            training_data_path: env_optional("TRAINING_DATA_PATH")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_trees >= 1, "RF_N_TREES must be at least 1");
        ensure!(
            self.min_samples_split >= 2,
            "RF_MIN_SAMPLES_SPLIT must be at least 2"
        );
        ensure!(
            self.test_ratio > 0.0 && self.test_ratio < 1.0,
            "TRAIN_TEST_RATIO must be between 0 and 1 (exclusive), got {}",
            self.test_ratio
        );
        Ok(())
    }

    pub fn trainer_params(&self) -> TrainerParams {
        TrainerParams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            test_ratio: self.test_ratio,
            seed: self.seed,
            coverage: self.coverage,
        }
    }
}
