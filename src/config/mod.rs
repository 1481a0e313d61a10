//! Configuration module for Rustenergy.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Model, Insight, Simulation and Observability.

mod insight_config;
mod model_config;
mod observability_config;
mod simulation_config;

pub use insight_config::InsightEnvConfig;
pub use model_config::ModelEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use simulation_config::SimulationEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub model: ModelEnvConfig,
    pub insight: InsightEnvConfig,
    pub simulation: SimulationEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let model = ModelEnvConfig::from_env().context("Failed to load model config")?;
        let insight = InsightEnvConfig::from_env().context("Failed to load insight config")?;
        let simulation =
            SimulationEnvConfig::from_env().context("Failed to load simulation config")?;
        let observability = ObservabilityEnvConfig::from_env()
            .context("Failed to load observability config")?;

        Ok(Self {
            model,
            insight,
            simulation,
            observability,
        })
    }
}

/// Parses `raw`, falling back to `default` when the variable is unset or blank.
pub(crate) fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context(format!("Failed to parse {}={}", key, value)),
    }
}

/// Like [`parse_value`] for variables without a default.
pub(crate) fn parse_optional<T>(key: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context(format!("Failed to parse {}={}", key, value)),
    }
}

pub(crate) fn env_value<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, env::var(key).ok(), default)
}

pub(crate) fn env_optional<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    parse_optional(key, env::var(key).ok())
}
