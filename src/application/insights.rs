//! Real-time insight engine.
//!
//! Compares a live reading with the model expectation for its timestamp and
//! derives an efficiency score plus rule-based recommendations.

use crate::application::ml::ModelSnapshot;
use crate::domain::energy::{Insight, Reading, Recommendation, RecommendationKind};
use crate::domain::errors::ForecastError;
use crate::domain::ports::Clock;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::debug;

pub const SPIKE_MESSAGE: &str = "Unusual energy spike detected";
pub const PEAK_SHIFT_MESSAGE: &str =
    "Currently in peak hours. Consider shifting heavy appliance usage to off-peak hours";
pub const PEAK_SHIFT_SAVINGS: &str = "0.45$ per kWh";

/// Thresholds for the recommendation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRules {
    /// Usage above `expected * spike_ratio` raises an alert
    pub spike_ratio: f64,
    /// Savings per kWh of excess usage
    pub savings_rate: f64,
    /// Wall-clock hours (inclusive) considered peak
    pub peak_hours: RangeInclusive<u32>,
}

impl Default for InsightRules {
    fn default() -> Self {
        Self {
            spike_ratio: 1.2,
            savings_rate: 0.15,
            peak_hours: 17..=20,
        }
    }
}

impl InsightRules {
    /// Spike alert first, then the peak-hour shift. Both are independent.
    pub fn recommendations(&self, usage: f64, expected: f64, hour: u32) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if usage > expected * self.spike_ratio {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Alert,
                message: SPIKE_MESSAGE.to_string(),
                potential_savings: format_currency((usage - expected) * self.savings_rate),
            });
        }

        if self.peak_hours.contains(&hour) {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Shift,
                message: PEAK_SHIFT_MESSAGE.to_string(),
                potential_savings: PEAK_SHIFT_SAVINGS.to_string(),
            });
        }

        recommendations
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("{:.2}$", amount)
}

/// `100 - relative overshoot in percent`, clamped to [0, 100] and truncated.
///
/// Undefined when the expectation is zero or not finite.
pub fn efficiency_score(usage: f64, expected: f64) -> Result<u8, ForecastError> {
    if expected == 0.0 || !expected.is_finite() {
        return Err(ForecastError::DegenerateExpectedUsage { usage, expected });
    }
    let score = 100.0 - ((usage - expected) / expected) * 100.0;
    Ok(score.clamp(0.0, 100.0).trunc() as u8)
}

pub struct InsightEngine {
    rules: InsightRules,
    clock: Arc<dyn Clock>,
}

impl InsightEngine {
    pub fn new(rules: InsightRules, clock: Arc<dyn Clock>) -> Self {
        Self { rules, clock }
    }

    pub fn insights(
        &self,
        snapshot: &ModelSnapshot,
        reading: &Reading,
    ) -> Result<Insight, ForecastError> {
        reading.validate()?;
        let expected_usage = snapshot.predict_one(reading.timestamp)?;
        let efficiency_score = efficiency_score(reading.usage, expected_usage)?;
        let hour = self.clock.current_hour();

        debug!(
            "Insight: usage={:.3} expected={:.3} score={} wall_hour={}",
            reading.usage, expected_usage, efficiency_score, hour
        );

        Ok(Insight {
            current_usage: reading.usage,
            expected_usage,
            efficiency_score,
            recommendations: self
                .rules
                .recommendations(reading.usage, expected_usage, hour),
        })
    }
}
