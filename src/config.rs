use crate::errors::{BenchError, BenchResult};
use crate::io::{FeatherCompression, TableFormat, WriteOptions};
use crate::observability::Timer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROWS: usize = 1_000_000;
pub const DEFAULT_COLUMNS: usize = 5;
pub const MAX_DECIMALS: u32 = 10;

/// Benchmark settings, loadable from YAML. Missing keys take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    pub rows: usize,
    pub columns: usize,
    pub seed: u64,
    pub output_dir: PathBuf,
    pub formats: Vec<TableFormat>,
    /// Rounding applied to reported file sizes
    pub decimals: u32,
    pub timer: Timer,
    pub feather: FeatherConfig,
    pub csv: CsvConfig,
    pub verify: bool,
    pub checksums: bool,
    pub cleanup: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FeatherConfig {
    pub compression: FeatherCompression,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CsvConfig {
    pub float_precision: Option<usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            seed: 0,
            output_dir: PathBuf::from("."),
            formats: vec![TableFormat::Feather, TableFormat::Csv],
            decimals: 2,
            timer: Timer::Wall,
            feather: FeatherConfig::default(),
            csv: CsvConfig::default(),
            verify: false,
            checksums: false,
            cleanup: false,
        }
    }
}

/// Values given on the command line. `Some` wins over the file/defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub formats: Option<Vec<TableFormat>>,
    pub decimals: Option<u32>,
    pub timer: Option<Timer>,
    pub feather_compression: Option<FeatherCompression>,
    pub csv_float_precision: Option<usize>,
    pub verify: bool,
    pub checksums: bool,
    pub cleanup: bool,
}

impl BenchConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> BenchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> BenchResult<Self> {
        serde_yaml::from_str(content).map_err(|e| BenchError::ConfigError(e, None))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(rows) = overrides.rows {
            self.rows = rows;
        }
        if let Some(columns) = overrides.columns {
            self.columns = columns;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(formats) = overrides.formats {
            self.formats = formats;
        }
        if let Some(decimals) = overrides.decimals {
            self.decimals = decimals;
        }
        if let Some(timer) = overrides.timer {
            self.timer = timer;
        }
        if let Some(compression) = overrides.feather_compression {
            self.feather.compression = compression;
        }
        if let Some(precision) = overrides.csv_float_precision {
            self.csv.float_precision = Some(precision);
        }
        // Flags can only switch behaviour on.
        self.verify |= overrides.verify;
        self.checksums |= overrides.checksums;
        self.cleanup |= overrides.cleanup;
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.rows == 0 {
            return Err(BenchError::InvalidConfig("rows must be at least 1".into()));
        }
        if self.columns == 0 {
            return Err(BenchError::InvalidConfig(
                "columns must be at least 1".into(),
            ));
        }
        if self.formats.is_empty() {
            return Err(BenchError::InvalidConfig("no formats selected".into()));
        }
        let mut seen = HashSet::new();
        for format in &self.formats {
            if !seen.insert(format) {
                return Err(BenchError::InvalidConfig(format!(
                    "format {} listed more than once",
                    format
                )));
            }
        }
        if self.decimals > MAX_DECIMALS {
            return Err(BenchError::InvalidConfig(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        Ok(())
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            feather_compression: self.feather.compression,
            csv_float_precision: self.csv.float_precision,
        }
    }

    /// Largest decoding error a round trip may show for `format`.
    pub fn tolerance(&self, format: TableFormat) -> Option<f64> {
        match (format, self.csv.float_precision) {
            (TableFormat::Csv, Some(p)) => Some(0.5 * 10f64.powi(-(p as i32)) + f64::EPSILON),
            _ => None,
        }
    }

    pub fn output_path(&self, format: TableFormat) -> PathBuf {
        self.output_dir.join(format.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = BenchConfig::default();
        assert_eq!(config.rows, 1_000_000);
        assert_eq!(config.columns, 5);
        assert_eq!(config.seed, 0);
        assert_eq!(config.formats, vec![TableFormat::Feather, TableFormat::Csv]);
        assert_eq!(config.decimals, 2);
        assert_eq!(config.timer, Timer::Wall);
        assert!(!config.cleanup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = r#"
rows: 1000
seed: 42
timer: cpu
formats: [csv, feather, parquet]
feather:
  compression: lz4
csv:
  float_precision: 6
"#;
        let config = BenchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.rows, 1000);
        assert_eq!(config.columns, 5); // Default
        assert_eq!(config.seed, 42);
        assert_eq!(config.timer, Timer::Cpu);
        assert_eq!(
            config.formats,
            vec![TableFormat::Csv, TableFormat::Feather, TableFormat::Parquet]
        );
        assert_eq!(config.feather.compression, FeatherCompression::Lz4);
        assert_eq!(config.csv.float_precision, Some(6));
    }

    #[test]
    fn test_deserialize_unknown_key() {
        let result = BenchConfig::from_yaml("rowz: 10\n");
        assert!(matches!(result, Err(BenchError::ConfigError(_, _))));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = BenchConfig::from_yaml("rows: 10\ncolumns: 3\nverify: true\n").unwrap();
        config.apply_overrides(ConfigOverrides {
            rows: Some(20),
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        });
        assert_eq!(config.rows, 20);
        assert_eq!(config.columns, 3);
        assert!(config.verify);
        assert_eq!(
            config.output_path(TableFormat::Feather),
            PathBuf::from("/tmp/out/data.feather")
        );
    }

    #[test]
    fn test_validate_rejects() {
        let zero_rows = BenchConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(zero_rows.validate(), Err(BenchError::InvalidConfig(_))));

        let zero_columns = BenchConfig {
            columns: 0,
            ..Default::default()
        };
        assert!(zero_columns.validate().is_err());

        let duplicated = BenchConfig {
            formats: vec![TableFormat::Csv, TableFormat::Csv],
            ..Default::default()
        };
        assert!(duplicated.validate().is_err());

        let no_formats = BenchConfig {
            formats: vec![],
            ..Default::default()
        };
        assert!(no_formats.validate().is_err());

        let too_precise = BenchConfig {
            decimals: 11,
            ..Default::default()
        };
        assert!(too_precise.validate().is_err());
    }

    #[test]
    fn test_tolerance_only_for_rounded_csv() {
        let mut config = BenchConfig::default();
        assert_eq!(config.tolerance(TableFormat::Csv), None);

        config.csv.float_precision = Some(3);
        let tol = config.tolerance(TableFormat::Csv).unwrap();
        assert!(tol > 0.0005 && tol < 0.0006);
        assert_eq!(config.tolerance(TableFormat::Feather), None);
    }
}
