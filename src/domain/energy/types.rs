use crate::domain::errors::ForecastError;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp formats accepted from readings files and the command line,
/// tried in order after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A single energy meter reading in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Usage in kWh
    pub usage: f64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, usage: f64) -> Result<Self, ForecastError> {
        let reading = Self { timestamp, usage };
        reading.validate()?;
        Ok(reading)
    }

    /// Builds a reading from a textual timestamp.
    pub fn parse(timestamp: &str, usage: f64) -> Result<Self, ForecastError> {
        Self::new(parse_timestamp(timestamp)?, usage)
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.usage.is_finite() {
            return Err(ForecastError::malformed(format!(
                "usage at {} is not a finite number",
                self.timestamp
            )));
        }
        if self.usage < 0.0 {
            return Err(ForecastError::malformed(format!(
                "usage at {} is negative ({})",
                self.timestamp, self.usage
            )));
        }
        Ok(())
    }
}

/// Parses a timestamp string. Offsets in RFC 3339 input are kept as the
/// local wall-clock time they describe.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ForecastError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ForecastError::malformed(format!("unparsable timestamp '{}'", raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Alert,
    Shift,
}

/// An actionable tip. `potential_savings` is free text with its unit attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub potential_savings: String,
}

/// Live reading compared against the model expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub current_usage: f64,
    pub expected_usage: f64,
    pub efficiency_score: u8,
    pub recommendations: Vec<Recommendation>,
}
