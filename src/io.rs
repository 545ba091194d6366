use crate::errors::{BenchError, BenchResult};
use clap::ValueEnum;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;

/// On-disk table formats the benchmark can exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Arrow IPC file (Feather v2)
    Feather,
    /// Comma-separated text with a header row
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn label(&self) -> &'static str {
        match self {
            TableFormat::Feather => "Feather",
            TableFormat::Csv => "CSV",
            TableFormat::Parquet => "Parquet",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TableFormat::Feather => "data.feather",
            TableFormat::Csv => "data.csv",
            TableFormat::Parquet => "data.parquet",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Block compression applied to Feather record batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeatherCompression {
    #[default]
    Uncompressed,
    Lz4,
    Zstd,
}

impl FeatherCompression {
    fn to_ipc(self) -> Option<IpcCompression> {
        match self {
            FeatherCompression::Uncompressed => None,
            FeatherCompression::Lz4 => Some(IpcCompression::LZ4),
            FeatherCompression::Zstd => Some(IpcCompression::ZSTD),
        }
    }
}

/// Per-format writer knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WriteOptions {
    pub feather_compression: FeatherCompression,
    /// Fixed number of fractional digits for CSV floats; `None` writes the
    /// shortest representation that parses back to the same value.
    pub csv_float_precision: Option<usize>,
}

pub fn write_feather<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    compression: FeatherCompression,
) -> BenchResult<()> {
    let mut file = File::create(path).map_err(BenchError::IoError)?;
    IpcWriter::new(&mut file)
        .with_compression(compression.to_ipc())
        .finish(df)
        .map_err(BenchError::PolarsError)?;
    Ok(())
}

pub fn read_feather<P: AsRef<Path>>(path: P) -> BenchResult<DataFrame> {
    let file = File::open(path).map_err(BenchError::IoError)?;
    IpcReader::new(file).finish().map_err(BenchError::PolarsError)
}

pub fn write_csv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    float_precision: Option<usize>,
) -> BenchResult<()> {
    let mut file = File::create(path).map_err(BenchError::IoError)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_float_precision(float_precision)
        .finish(df)
        .map_err(BenchError::PolarsError)?;
    Ok(())
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> BenchResult<DataFrame> {
    LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(BenchError::PolarsError)
}

pub fn write_parquet<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> BenchResult<()> {
    let file = File::create(path).map_err(BenchError::IoError)?;
    ParquetWriter::new(file)
        .finish(df)
        .map_err(BenchError::PolarsError)?;
    Ok(())
}

pub fn read_parquet<P: AsRef<Path>>(path: P) -> BenchResult<DataFrame> {
    LazyFrame::scan_parquet(path, Default::default())
        .and_then(|lf| lf.collect())
        .map_err(BenchError::PolarsError)
}

pub fn write_table<P: AsRef<Path>>(
    format: TableFormat,
    df: &mut DataFrame,
    path: P,
    options: &WriteOptions,
) -> BenchResult<()> {
    match format {
        TableFormat::Feather => write_feather(df, path, options.feather_compression),
        TableFormat::Csv => write_csv(df, path, options.csv_float_precision),
        TableFormat::Parquet => write_parquet(df, path),
    }
}

pub fn read_table<P: AsRef<Path>>(format: TableFormat, path: P) -> BenchResult<DataFrame> {
    match format {
        TableFormat::Feather => read_feather(path),
        TableFormat::Csv => read_csv(path),
        TableFormat::Parquet => read_parquet(path),
    }
}
