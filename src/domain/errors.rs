use thiserror::Error;

/// Errors raised by the forecasting and insight pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Model schema not ready: train the model before predicting")]
    SchemaNotReady,

    #[error("Malformed reading: {reason}")]
    MalformedReading { reason: String },

    #[error("Expected usage is {expected}; efficiency score is undefined for usage {usage:.3}")]
    DegenerateExpectedUsage { usage: f64, expected: f64 },

    #[error("Insufficient training data: {samples} samples, need at least {required}")]
    InsufficientData { samples: usize, required: usize },

    #[error("Regression model failure: {reason}")]
    ModelFailure { reason: String },

    #[error("Reading source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    #[error("Model state lock poisoned")]
    StateUnavailable,
}

impl ForecastError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ForecastError::MalformedReading {
            reason: reason.into(),
        }
    }

    pub fn model(reason: impl std::fmt::Display) -> Self {
        ForecastError::ModelFailure {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_usage_formatting() {
        let error = ForecastError::DegenerateExpectedUsage {
            usage: 6.5,
            expected: 0.0,
        };

        let msg = error.to_string();
        assert!(msg.contains("6.500"));
        assert!(msg.contains("Expected usage is 0"));
    }

    #[test]
    fn test_insufficient_data_formatting() {
        let error = ForecastError::InsufficientData {
            samples: 1,
            required: 2,
        };

        let msg = error.to_string();
        assert!(msg.contains("1 samples"));
        assert!(msg.contains("at least 2"));
    }

    #[test]
    fn test_malformed_helper() {
        assert_eq!(
            ForecastError::malformed("negative usage"),
            ForecastError::MalformedReading {
                reason: "negative usage".to_string()
            }
        );
    }
}
