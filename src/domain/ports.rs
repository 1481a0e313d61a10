use crate::domain::energy::Reading;
use crate::domain::errors::ForecastError;
use chrono::{NaiveDateTime, Timelike};

/// Wall-clock provider. The peak-hour rule reads this, never the reading's own timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn current_hour(&self) -> u32 {
        self.now().hour()
    }
}

/// Historical readings used for training.
pub trait ReadingSource: Send + Sync {
    fn history(&self) -> Result<Vec<Reading>, ForecastError>;

    fn name(&self) -> &str;
}

/// The reading a meter reports right now.
pub trait LiveReadingSource: Send + Sync {
    fn current(&self) -> Result<Reading, ForecastError>;
}
