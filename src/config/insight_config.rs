//! Insight rules and forecast presentation settings.

use super::env_value;
use crate::application::insights::InsightRules;
use anyhow::{Result, ensure};

#[derive(Debug, Clone)]
pub struct InsightEnvConfig {
    pub spike_ratio: f64,
    pub spike_savings_rate: f64,
    pub peak_start_hour: u32,
    pub peak_end_hour: u32,
    /// Multiplier applied to each forecast value to get the "optimal" target
    pub optimal_usage_factor: f64,
    pub forecast_horizon_hours: u32,
}

impl Default for InsightEnvConfig {
    fn default() -> Self {
        Self {
            spike_ratio: 1.2,
            spike_savings_rate: 0.15,
            peak_start_hour: 17,
            peak_end_hour: 20,
            optimal_usage_factor: 0.8,
            forecast_horizon_hours: 24,
        }
    }
}

impl InsightEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            spike_ratio: env_value("SPIKE_RATIO", defaults.spike_ratio)?,
            spike_savings_rate: env_value("SPIKE_SAVINGS_RATE", defaults.spike_savings_rate)?,
            peak_start_hour: env_value("PEAK_START_HOUR", defaults.peak_start_hour)?,
            peak_end_hour: env_value("PEAK_END_HOUR", defaults.peak_end_hour)?,
            optimal_usage_factor: env_value(
                "OPTIMAL_USAGE_FACTOR",
                defaults.optimal_usage_factor,
            )?,
            forecast_horizon_hours: env_value(
                "FORECAST_HORIZON_HOURS",
                defaults.forecast_horizon_hours,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.peak_start_hour <= self.peak_end_hour && self.peak_end_hour < 24,
            "Peak hours must satisfy PEAK_START_HOUR <= PEAK_END_HOUR < 24, got {}..={}",
            self.peak_start_hour,
            self.peak_end_hour
        );
        ensure!(self.spike_ratio > 0.0, "SPIKE_RATIO must be positive");
        ensure!(
            self.spike_savings_rate >= 0.0,
            "SPIKE_SAVINGS_RATE must not be negative"
        );
        Ok(())
    }

    pub fn rules(&self) -> InsightRules {
        InsightRules {
            spike_ratio: self.spike_ratio,
            savings_rate: self.spike_savings_rate,
            peak_hours: self.peak_start_hour..=self.peak_end_hour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        assert_eq!(InsightEnvConfig::default().rules(), InsightRules::default());
    }

    #[test]
    fn test_inverted_peak_window_rejected() {
        let config = InsightEnvConfig {
            peak_start_hour: 21,
            peak_end_hour: 17,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
