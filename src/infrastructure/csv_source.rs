use crate::domain::energy::Reading;
use crate::domain::errors::ForecastError;
use crate::domain::ports::ReadingSource;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ReadingRecord {
    timestamp: String,
    usage: f64,
}

/// Historical readings from a CSV file with `timestamp,usage` headers.
#[derive(Debug, Clone)]
pub struct CsvReadingSource {
    path: PathBuf,
    name: String,
}

impl CsvReadingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl ReadingSource for CsvReadingSource {
    fn history(&self) -> Result<Vec<Reading>, ForecastError> {
        let file = File::open(&self.path).map_err(|e| ForecastError::SourceUnavailable {
            reason: format!("failed to open {:?}: {}", self.path, e),
        })?;
        let readings = read_readings(BufReader::new(file))?;
        info!("Loaded {} readings from {:?}", readings.len(), self.path);
        Ok(readings)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parses CSV rows into validated readings. Row numbers in errors are 1-based
/// and count the header.
pub fn read_readings<R: Read>(reader: R) -> Result<Vec<Reading>, ForecastError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut readings = Vec::new();

    for (i, result) in rdr.deserialize::<ReadingRecord>().enumerate() {
        let line = i + 2;
        let record = result
            .map_err(|e| ForecastError::malformed(format!("line {}: {}", line, e)))?;
        let reading = Reading::parse(&record.timestamp, record.usage).map_err(|e| match e {
            ForecastError::MalformedReading { reason } => {
                ForecastError::malformed(format!("line {}: {}", line, reason))
            }
            other => other,
        })?;
        readings.push(reading);
    }

    Ok(readings)
}
