use super::env_value;
use anyhow::{Result, ensure};

/// Sample-series generator and simulated meter settings.
#[derive(Debug, Clone)]
pub struct SimulationEnvConfig {
    pub sample_days: u32,
    pub sample_noise_std: f64,
    /// Usage reported by the simulated meter, kWh
    pub simulated_usage: f64,
}

impl Default for SimulationEnvConfig {
    fn default() -> Self {
        Self {
            sample_days: 7,
            sample_noise_std: 0.5,
            simulated_usage: 6.5,
        }
    }
}

impl SimulationEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            sample_days: env_value("SAMPLE_DAYS", defaults.sample_days)?,
            sample_noise_std: env_value("SAMPLE_NOISE_STD", defaults.sample_noise_std)?,
            simulated_usage: env_value("SIMULATED_USAGE", defaults.simulated_usage)?,
        };
        ensure!(config.sample_days >= 1, "SAMPLE_DAYS must be at least 1");
        ensure!(
            config.sample_noise_std >= 0.0,
            "SAMPLE_NOISE_STD must not be negative"
        );
        ensure!(
            config.simulated_usage >= 0.0,
            "SIMULATED_USAGE must not be negative"
        );
        Ok(config)
    }
}
