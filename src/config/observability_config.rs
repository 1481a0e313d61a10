//! Observability configuration parsing from environment variables.
//!
//! This module handles loading the status reporter settings.

use super::env_value;
use anyhow::Result;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            enabled: env_value("OBSERVABILITY_ENABLED", defaults.enabled)?,
            interval_seconds: env_value("OBSERVABILITY_INTERVAL", defaults.interval_seconds)?
                .max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval_seconds, 60);
    }
}
