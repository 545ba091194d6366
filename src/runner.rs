use crate::config::BenchConfig;
use crate::data;
use crate::errors::{BenchError, BenchResult};
use crate::io::{self, TableFormat, WriteOptions};
use crate::observability::{timed, timed_with, FileStats};
use crate::report::{ComparisonReport, FormatResult};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

pub fn run_benchmark(config: &BenchConfig, run_id: Uuid) -> BenchResult<ComparisonReport> {
    config.validate()?;
    info!(
        "Benchmarking {} rows x {} columns (seed {}) into {:?}",
        config.rows, config.columns, config.seed, config.output_dir
    );
    std::fs::create_dir_all(&config.output_dir).map_err(BenchError::IoError)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .map_err(|e| BenchError::Unknown(e.into()))?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    // 1. Data
    pb.set_message("Generating table...");
    let (mut df, gen_time) =
        timed(|| data::generate_frame(config.rows, config.columns, config.seed))?;
    debug!("Generated {:?} table in {:?}", df.shape(), gen_time);

    // 2. Formats, strictly one after another
    let options = config.write_options();
    let mut results = Vec::with_capacity(config.formats.len());
    for &format in &config.formats {
        pb.set_message(format!("Benchmarking {}...", format));
        results.push(bench_format(format, &mut df, config, &options)?);
    }

    // 3. Cleanup
    if config.cleanup {
        for format in &config.formats {
            let path = config.output_path(*format);
            std::fs::remove_file(&path).map_err(BenchError::IoError)?;
            debug!("Removed {:?}", path);
        }
    }
    pb.finish_and_clear();

    info!("Benchmark completed successfully.");
    Ok(ComparisonReport {
        run_id: run_id.to_string(),
        timestamp: Utc::now(),
        rows: config.rows,
        columns: config.columns,
        seed: config.seed,
        timer: config.timer,
        results,
    })
}

fn bench_format(
    format: TableFormat,
    df: &mut DataFrame,
    config: &BenchConfig,
    options: &WriteOptions,
) -> BenchResult<FormatResult> {
    let path = config.output_path(format);

    let ((), write_time) =
        timed_with(config.timer, || io::write_table(format, df, &path, options))?;
    info!("{} write: {:.3}s -> {:?}", format, write_time.as_secs_f64(), path);

    let (decoded, read_time) = timed_with(config.timer, || io::read_table(format, &path))?;
    info!("{} read: {:.3}s", format, read_time.as_secs_f64());

    let verified = if config.verify {
        data::verify_round_trip(df, &decoded, config.tolerance(format))?;
        info!("{} round trip verified", format);
        true
    } else {
        false
    };
    drop(decoded);

    let file = stat(&path, config)?;
    Ok(FormatResult {
        format,
        write_secs: write_time.as_secs_f64(),
        read_secs: read_time.as_secs_f64(),
        size_mb: file.size_mb,
        verified,
        file,
    })
}

fn stat(path: &Path, config: &BenchConfig) -> BenchResult<FileStats> {
    let stats = FileStats::collect(path, config.decimals, config.checksums)
        .map_err(BenchError::IoError)?;
    debug!("{:?}: {} bytes", path, stats.size_bytes);
    Ok(stats)
}
