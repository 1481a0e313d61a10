use crate::domain::energy::Reading;
use crate::domain::errors::ForecastError;
use crate::domain::ports::{Clock, ReadingSource};
use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::TAU;
use std::sync::Arc;

const BASE_USAGE: f64 = 5.0;
const WEEKLY_AMPLITUDE: f64 = 2.0;
const DAILY_AMPLITUDE: f64 = 1.5;

/// Synthetic hourly usage series ending at the clock's current time.
///
/// `usage = sin(multi-day ramp) * 2 + 5 + sin(daily ramp) * 1.5 + N(0, noise_std)`,
/// clamped at zero. One reading per hour over `days` days.
pub struct SampleDataGenerator {
    days: u32,
    noise_std: f64,
    seed: Option<u64>,
    clock: Arc<dyn Clock>,
}

impl SampleDataGenerator {
    pub fn new(days: u32, noise_std: f64, seed: Option<u64>, clock: Arc<dyn Clock>) -> Self {
        Self {
            days,
            noise_std,
            seed,
            clock,
        }
    }

    pub fn generate(&self) -> Result<Vec<Reading>, ForecastError> {
        if !(self.noise_std >= 0.0 && self.noise_std.is_finite()) {
            return Err(ForecastError::SourceUnavailable {
                reason: format!(
                    "noise std must be finite and non-negative, got {}",
                    self.noise_std
                ),
            });
        }
        let periods = hourly_periods(self.days);
        let noise = Normal::new(0.0, self.noise_std).map_err(|e| {
            ForecastError::SourceUnavailable {
                reason: format!("invalid noise std {}: {}", self.noise_std, e),
            }
        })?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let start = self.clock.now() - Duration::days(self.days as i64);
        let base = linspace(0.0, TAU * self.days as f64, periods);
        let daily = linspace(0.0, TAU, 24);

        (0..periods)
            .map(|i| {
                let usage = base[i].sin() * WEEKLY_AMPLITUDE
                    + BASE_USAGE
                    + daily[i % 24].sin() * DAILY_AMPLITUDE
                    + noise.sample(&mut rng);
                Reading::new(start + Duration::hours(i as i64), usage.max(0.0))
            })
            .collect()
    }
}

impl ReadingSource for SampleDataGenerator {
    fn history(&self) -> Result<Vec<Reading>, ForecastError> {
        self.generate()
    }

    fn name(&self) -> &str {
        "sample generator"
    }
}

fn hourly_periods(days: u32) -> usize {
    days as usize * 24
}

/// `n` evenly spaced values over `[start, stop]`, both ends included.
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
