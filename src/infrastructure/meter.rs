use crate::domain::energy::Reading;
use crate::domain::errors::ForecastError;
use crate::domain::ports::{Clock, LiveReadingSource};
use std::sync::Arc;

/// Stand-in for a smart meter: reports a fixed usage stamped with the clock's time.
pub struct SimulatedMeter {
    usage: f64,
    clock: Arc<dyn Clock>,
}

impl SimulatedMeter {
    pub fn new(usage: f64, clock: Arc<dyn Clock>) -> Self {
        Self { usage, clock }
    }
}

impl LiveReadingSource for SimulatedMeter {
    fn current(&self) -> Result<Reading, ForecastError> {
        Reading::new(self.clock.now(), self.usage)
    }
}
