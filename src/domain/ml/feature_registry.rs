//! Calendar feature expansion for the usage model.
//!
//! Every timestamp becomes a one-hot hour indicator, a one-hot day-of-week
//! indicator (0 = Monday) and a weekend flag. Training batches define the
//! [`Schema`]; inference batches are reconciled against it so the model always
//! sees the same columns in the same order.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

pub const WEEKEND_FEATURE: &str = "is_weekend";
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_WEEK: u32 = 7;

pub fn hour_feature(hour: u32) -> String {
    format!("hour_{}", hour)
}

pub fn day_feature(day: u32) -> String {
    format!("day_{}", day)
}

/// Which categories become columns when a batch is expanded without a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureCoverage {
    /// Only hours and days present in the batch.
    #[default]
    Observed,
    /// All 24 hours and 7 days, whatever the batch covers.
    FullCalendar,
}

impl FromStr for FeatureCoverage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observed" => Ok(FeatureCoverage::Observed),
            "full" | "full_calendar" => Ok(FeatureCoverage::FullCalendar),
            _ => anyhow::bail!(
                "Invalid FEATURE_COVERAGE: {}. Must be 'observed' or 'full'",
                s
            ),
        }
    }
}

/// Raw calendar attributes of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
}

impl CalendarFeatures {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        let day_of_week = ts.weekday().num_days_from_monday();
        Self {
            hour: ts.hour(),
            day_of_week,
            is_weekend: day_of_week >= 5,
        }
    }

    fn value_of(&self, column: &str) -> f64 {
        if column == WEEKEND_FEATURE {
            return if self.is_weekend { 1.0 } else { 0.0 };
        }
        let hit = match column.split_once('_') {
            Some(("hour", h)) => h.parse::<u32>().ok() == Some(self.hour),
            Some(("day", d)) => d.parse::<u32>().ok() == Some(self.day_of_week),
            _ => false,
        };
        if hit { 1.0 } else { 0.0 }
    }
}

/// Ordered feature column names frozen at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<String>,
}

/// Column differences between a batch expansion and a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// In the schema, absent from the batch: filled with 0.
    pub missing: Vec<String>,
    /// Produced by the batch, unknown to the schema: dropped.
    pub extra: Vec<String>,
}

impl SchemaDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn diff(&self, batch_columns: &[String]) -> SchemaDiff {
        SchemaDiff {
            missing: self
                .columns
                .iter()
                .filter(|c| !batch_columns.contains(*c))
                .cloned()
                .collect(),
            extra: batch_columns
                .iter()
                .filter(|c| !self.contains(c))
                .cloned()
                .collect(),
        }
    }
}

/// Ordered name -> value mapping for one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Projects this vector onto `schema`: schema columns it lacks become 0,
    /// columns outside the schema are dropped, order follows the schema.
    pub fn reconcile(&self, schema: &Schema) -> FeatureVector {
        FeatureVector {
            entries: schema
                .columns()
                .iter()
                .map(|c| (c.clone(), self.get(c).unwrap_or(0.0)))
                .collect(),
        }
    }
}

/// Feature rows sharing one column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub schema: Schema,
    pub rows: Vec<FeatureVector>,
}

impl FeatureTable {
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(FeatureVector::values).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    coverage: FeatureCoverage,
}

impl FeatureBuilder {
    pub fn new(coverage: FeatureCoverage) -> Self {
        Self { coverage }
    }

    /// Columns produced by expanding `calendar` before any schema is applied:
    /// hour indicators, then day indicators, then the weekend flag.
    pub fn batch_columns(&self, calendar: &[CalendarFeatures]) -> Vec<String> {
        let (hours, days): (BTreeSet<u32>, BTreeSet<u32>) = match self.coverage {
            FeatureCoverage::Observed => (
                calendar.iter().map(|c| c.hour).collect(),
                calendar.iter().map(|c| c.day_of_week).collect(),
            ),
            FeatureCoverage::FullCalendar => {
                ((0..HOURS_PER_DAY).collect(), (0..DAYS_PER_WEEK).collect())
            }
        };

        hours
            .into_iter()
            .map(hour_feature)
            .chain(days.into_iter().map(day_feature))
            .chain(std::iter::once(WEEKEND_FEATURE.to_string()))
            .collect()
    }

    /// Expands `timestamps`. Without a schema the batch columns become the
    /// schema of the returned table; with one, every row is reconciled to it.
    pub fn build(&self, timestamps: &[NaiveDateTime], schema: Option<&Schema>) -> FeatureTable {
        let calendar: Vec<CalendarFeatures> =
            timestamps.iter().map(CalendarFeatures::from_timestamp).collect();
        let columns = self.batch_columns(&calendar);

        let raw_rows = calendar.iter().map(|cal| FeatureVector {
            entries: columns
                .iter()
                .map(|c| (c.clone(), cal.value_of(c)))
                .collect(),
        });

        match schema {
            None => FeatureTable {
                rows: raw_rows.collect(),
                schema: Schema::new(columns),
            },
            Some(schema) => {
                let diff = schema.diff(&columns);
                if !diff.is_empty() {
                    tracing::debug!(
                        "Reconciling features: {} missing (zero-filled), {} dropped",
                        diff.missing.len(),
                        diff.extra.len()
                    );
                }
                FeatureTable {
                    rows: raw_rows.map(|row| row.reconcile(schema)).collect(),
                    schema: schema.clone(),
                }
            }
        }
    }
}

/// Expands timestamps with observed-category coverage.
pub fn build_features(timestamps: &[NaiveDateTime], schema: Option<&Schema>) -> FeatureTable {
    FeatureBuilder::default().build(timestamps, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    // 2024-03-04 is a Monday
    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn hourly_week() -> Vec<NaiveDateTime> {
        (0..7 * 24).map(|h| at(4, 0) + Duration::hours(h)).collect()
    }

    #[test]
    fn test_training_schema_order() {
        let table = build_features(&[at(5, 9), at(9, 3), at(5, 3)], None);
        assert_eq!(
            table.schema.columns(),
            &["hour_3", "hour_9", "day_1", "day_5", "is_weekend"]
        );
        let first = &table.rows[0];
        assert_eq!(first.get("hour_9"), Some(1.0));
        assert_eq!(first.get("hour_3"), Some(0.0));
        assert_eq!(first.get("day_1"), Some(1.0));
        assert_eq!(first.get(WEEKEND_FEATURE), Some(0.0));
        assert_eq!(table.rows[1].get(WEEKEND_FEATURE), Some(1.0));
    }

    #[test]
    fn test_full_week_schema_width() {
        let table = build_features(&hourly_week(), None);
        assert_eq!(table.schema.len(), 24 + 7 + 1);
        assert_eq!(table.len(), 168);
    }

    #[test]
    fn test_inference_columns_match_schema() {
        let schema = build_features(&hourly_week(), None).schema;
        let table = build_features(&[at(10, 18)], Some(&schema));
        let names: Vec<&str> = table.rows[0].names().collect();
        assert_eq!(names, schema.columns());
        assert_eq!(table.rows[0].get("hour_18"), Some(1.0));
        assert_eq!(table.rows[0].get("day_6"), Some(1.0));
        assert_eq!(table.rows[0].values().iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn test_unseen_category_is_dropped() {
        // Trained on Monday mornings only
        let schema = build_features(&[at(4, 8), at(4, 9)], None).schema;
        let table = build_features(&[at(9, 22)], Some(&schema));
        let row = &table.rows[0];
        assert_eq!(row.len(), schema.len());
        assert_eq!(row.get("hour_22"), None);
        assert_eq!(row.get("hour_8"), Some(0.0));
        assert_eq!(row.get("day_0"), Some(0.0));
        assert_eq!(row.get(WEEKEND_FEATURE), Some(1.0));
    }

    #[test]
    fn test_full_calendar_keeps_unseen_hours() {
        let builder = FeatureBuilder::new(FeatureCoverage::FullCalendar);
        let schema = builder.build(&[at(4, 8)], None).schema;
        assert_eq!(schema.len(), 32);
        let row = &builder.build(&[at(9, 22)], Some(&schema)).rows[0];
        assert_eq!(row.get("hour_22"), Some(1.0));
        assert_eq!(row.get("day_5"), Some(1.0));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let schema = build_features(&hourly_week(), None).schema;
        let a = build_features(&[at(7, 13)], Some(&schema));
        let b = build_features(&[at(7, 13), at(8, 2)], Some(&schema));
        assert_eq!(a.rows[0], b.rows[0]);
    }

    #[test]
    fn test_weekend_flag() {
        for ts in hourly_week() {
            let cal = CalendarFeatures::from_timestamp(&ts);
            assert_eq!(cal.is_weekend, cal.day_of_week == 5 || cal.day_of_week == 6);
        }
    }

    #[test]
    fn test_schema_diff() {
        let schema = Schema::new(vec!["hour_1".into(), "day_0".into(), WEEKEND_FEATURE.into()]);
        let diff = schema.diff(&["hour_2".to_string(), WEEKEND_FEATURE.to_string()]);
        assert_eq!(diff.missing, vec!["hour_1", "day_0"]);
        assert_eq!(diff.extra, vec!["hour_2"]);
        assert!(schema.diff(schema.columns()).is_empty());
    }

    #[test]
    fn test_coverage_from_str() {
        assert_eq!(
            "FULL".parse::<FeatureCoverage>().unwrap(),
            FeatureCoverage::FullCalendar
        );
        assert_eq!(
            "observed".parse::<FeatureCoverage>().unwrap(),
            FeatureCoverage::Observed
        );
        assert!("sometimes".parse::<FeatureCoverage>().is_err());
    }
}
