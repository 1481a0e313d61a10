//! Push-based status reporter for Rustenergy
//!
//! Periodically outputs the current energy status as structured JSON to stdout.
//!
//! **Security**: This system only SENDS data, never accepts requests.

use crate::application::status::{CurrentStatus, StatusBoard};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const STATUS_PREFIX: &str = "STATUS_JSON:";

/// Status snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct StatusSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model: String,
    pub validation_score: f64,
    #[serde(flatten)]
    pub status: CurrentStatus,
}

/// Push-based status reporter
///
/// Outputs the current status as structured JSON logs on a configurable interval.
/// No HTTP server, no incoming connections - only outbound data.
pub struct StatusReporter {
    board: Arc<StatusBoard>,
    start_time: Instant,
    interval: Duration,
}

impl StatusReporter {
    /// Create a new status reporter
    ///
    /// # Arguments
    /// * `board` - Status board over a trained optimizer
    /// * `interval_seconds` - How often to output status (default: 60)
    pub fn new(board: Arc<StatusBoard>, interval_seconds: u64) -> Self {
        Self {
            board,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// Run the reporter in a loop, outputting status periodically
    pub async fn run(self) {
        info!(
            "StatusReporter: Starting push-based status (interval: {:?})",
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.report_once().await {
                warn!("Failed to report status: {}", e);
            }
        }
    }

    /// Collect one snapshot, print it, and return it.
    pub async fn report_once(&self) -> anyhow::Result<StatusSnapshot> {
        let snapshot = self.collect_snapshot()?;
        let json = serde_json::to_string(&snapshot)?;
        // Use a special prefix so logs can be easily filtered
        println!("{}{}", STATUS_PREFIX, json);
        info!(
            "Usage: {:.2} kWh | Expected: {:.2} kWh | Score: {} | Tips: {}",
            snapshot.status.current_status.current_usage,
            snapshot.status.current_status.expected_usage,
            snapshot.status.current_status.efficiency_score,
            snapshot.status.current_status.recommendations.len()
        );
        Ok(snapshot)
    }

    /// Collect current status snapshot
    pub fn collect_snapshot(&self) -> anyhow::Result<StatusSnapshot> {
        let model = self.board.optimizer().snapshot()?;
        let status = self.board.current_status()?;

        Ok(StatusSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: model.model_name().to_string(),
            validation_score: model.validation_score(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::system::Application;
    use crate::config::Config;
    use crate::infrastructure::clock::FixedClock;
    use chrono::NaiveDate;

    fn app() -> Application {
        let mut config = Config::default();
        config.model.n_trees = 10;
        config.model.seed = Some(9);
        let now = NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Application::build_with_clock(config, Arc::new(FixedClock(now))).unwrap()
    }

    #[test]
    fn test_snapshot_before_training_fails() {
        let reporter = StatusReporter::new(app().board.clone(), 60);
        assert!(reporter.collect_snapshot().is_err());
    }

    #[test]
    fn test_report_once_json_shape() {
        let app = app();
        app.train().unwrap();
        let reporter = StatusReporter::new(app.board.clone(), 60);

        let snapshot = tokio_test::block_on(reporter.report_once()).unwrap();
        assert_eq!(snapshot.model, "SmartCore Random Forest");
        assert_eq!(snapshot.status.predictions.len(), 24);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["current_status"]["recommendations"].is_array());
        assert_eq!(json["predictions"][0]["time"], "08:00");
        assert!(json["validation_score"].is_number());
    }
}
