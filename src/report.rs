use crate::errors::{BenchError, BenchResult};
use crate::io::TableFormat;
use crate::observability::{FileStats, Timer};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

pub const FORMAT_COLUMN: &str = "Format";
pub const WRITE_COLUMN: &str = "Write (s)";
pub const READ_COLUMN: &str = "Read (s)";
pub const SIZE_COLUMN: &str = "Size (mb)";

/// Measurements for one format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatResult {
    pub format: TableFormat,
    pub write_secs: f64,
    pub read_secs: f64,
    pub size_mb: f64,
    pub verified: bool,
    pub file: FileStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub rows: usize,
    pub columns: usize,
    pub seed: u64,
    pub timer: Timer,
    pub results: Vec<FormatResult>,
}

impl ComparisonReport {
    pub fn result(&self, format: TableFormat) -> Option<&FormatResult> {
        self.results.iter().find(|r| r.format == format)
    }

    /// One row per format, labelled in the `Format` column.
    pub fn to_dataframe(&self) -> BenchResult<DataFrame> {
        let labels: Vec<&str> = self.results.iter().map(|r| r.format.label()).collect();
        let writes: Vec<f64> = self.results.iter().map(|r| r.write_secs).collect();
        let reads: Vec<f64> = self.results.iter().map(|r| r.read_secs).collect();
        let sizes: Vec<f64> = self.results.iter().map(|r| r.size_mb).collect();

        DataFrame::new(vec![
            Column::new(FORMAT_COLUMN.into(), labels),
            Column::new(WRITE_COLUMN.into(), writes),
            Column::new(READ_COLUMN.into(), reads),
            Column::new(SIZE_COLUMN.into(), sizes),
        ])
        .map_err(BenchError::PolarsError)
    }

    pub fn to_json(&self) -> BenchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BenchError::Unknown(e.into()))
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.to_dataframe().map_err(|e| {
            tracing::error!("Failed to build comparison table: {}", e);
            fmt::Error
        })?;
        write!(f, "{}", table)
    }
}
