//! Dashboard payloads: service status, current status with a forecast, and
//! optimization tips. Field names follow the dashboard JSON contract.

use crate::application::optimizer::EnergyOptimizer;
use crate::domain::energy::{Insight, Recommendation};
use crate::domain::errors::ForecastError;
use crate::domain::ports::{Clock, LiveReadingSource};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RUNNING_STATUS: &str = "Energy Optimization API is running";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// `HH:MM`
    pub time: String,
    pub predicted: f64,
    pub optimal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStatus {
    pub current_status: Insight,
    pub predictions: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationTips {
    pub recommendations: Vec<Recommendation>,
}

pub struct StatusBoard {
    optimizer: Arc<EnergyOptimizer>,
    meter: Arc<dyn LiveReadingSource>,
    clock: Arc<dyn Clock>,
    horizon_hours: u32,
    optimal_factor: f64,
}

impl StatusBoard {
    pub fn new(
        optimizer: Arc<EnergyOptimizer>,
        meter: Arc<dyn LiveReadingSource>,
        clock: Arc<dyn Clock>,
        horizon_hours: u32,
        optimal_factor: f64,
    ) -> Self {
        Self {
            optimizer,
            meter,
            clock,
            horizon_hours,
            optimal_factor,
        }
    }

    pub fn optimizer(&self) -> &Arc<EnergyOptimizer> {
        &self.optimizer
    }

    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus {
            status: RUNNING_STATUS.to_string(),
        }
    }

    /// Insight for the live reading plus an hourly forecast starting now.
    pub fn current_status(&self) -> Result<CurrentStatus, ForecastError> {
        let reading = self.meter.current()?;
        let current_status = self.optimizer.get_insights(&reading)?;

        let now = self.clock.now();
        let horizon: Vec<_> = (0..self.horizon_hours as i64)
            .map(|h| now + Duration::hours(h))
            .collect();
        let forecast = self.optimizer.predict(&horizon)?;

        let predictions = horizon
            .iter()
            .zip(forecast)
            .map(|(ts, predicted)| ForecastPoint {
                time: ts.format("%H:%M").to_string(),
                predicted,
                optimal: predicted * self.optimal_factor,
            })
            .collect();

        Ok(CurrentStatus {
            current_status,
            predictions,
        })
    }

    pub fn optimization_tips(&self) -> Result<OptimizationTips, ForecastError> {
        let reading = self.meter.current()?;
        let insight = self.optimizer.get_insights(&reading)?;
        Ok(OptimizationTips {
            recommendations: insight.recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::insights::{InsightEngine, InsightRules};
    use crate::application::ml::{Trainer, TrainerParams};
    use crate::domain::energy::RecommendationKind;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::meter::SimulatedMeter;
    use crate::infrastructure::simulation::SampleDataGenerator;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(18, 15, 0)
            .unwrap()
    }

    fn board() -> StatusBoard {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
        let optimizer = Arc::new(EnergyOptimizer::new(
            Trainer::new(TrainerParams {
                n_trees: 10,
                seed: Some(5),
                ..Default::default()
            }),
            InsightEngine::new(InsightRules::default(), clock.clone()),
            Arc::new(SampleDataGenerator::new(7, 0.5, Some(5), clock.clone())),
        ));
        let meter = Arc::new(SimulatedMeter::new(6.5, clock.clone()));
        StatusBoard::new(optimizer, meter, clock, 24, 0.8)
    }

    #[test]
    fn test_service_status_json() {
        let json = serde_json::to_value(board().service_status()).unwrap();
        assert_eq!(json["status"], RUNNING_STATUS);
    }

    #[test]
    fn test_current_status_requires_training() {
        assert_eq!(
            board().current_status().unwrap_err(),
            ForecastError::SchemaNotReady
        );
    }

    #[test]
    fn test_current_status_forecast() {
        let board = board();
        board.optimizer().train(None).unwrap();

        let status = board.current_status().unwrap();
        assert_eq!(status.current_status.current_usage, 6.5);
        assert_eq!(status.predictions.len(), 24);
        assert_eq!(status.predictions[0].time, "18:15");
        assert_eq!(status.predictions[1].time, "19:15");
        assert_eq!(status.predictions[23].time, "17:15");
        for point in &status.predictions {
            assert!(point.predicted.is_finite());
            assert_relative_eq!(point.optimal, point.predicted * 0.8);
        }

        let json = serde_json::to_value(&status).unwrap();
        assert!(json["current_status"]["efficiency_score"].is_u64());
        assert!(json["predictions"][0]["optimal"].is_f64());
    }

    #[test]
    fn test_tips_include_peak_shift() {
        let board = board();
        board.optimizer().train(None).unwrap();
        let tips = board.optimization_tips().unwrap();
        assert!(
            tips.recommendations
                .iter()
                .any(|r| r.kind == RecommendationKind::Shift)
        );
    }
}
