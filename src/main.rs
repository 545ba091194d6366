use clap::{Args, Parser, Subcommand, ValueEnum};
use feather_bench::config::{BenchConfig, ConfigOverrides};
use feather_bench::io::{FeatherCompression, TableFormat};
use feather_bench::observability::Timer;
use miette::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Clone, ValueEnum, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "feather-bench")]
#[command(version = "0.1.0")]
#[command(about = "Compare Feather and CSV on write time, read time and file size", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (Info -> Debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Silence all logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format (text or json)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the table, write and read it in each format, print the comparison
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// YAML file with benchmark settings (flags below take precedence)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of rows to generate
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns to generate
    #[arg(long)]
    columns: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the data files are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Formats to benchmark, in order
    #[arg(long, value_enum, value_delimiter = ',')]
    formats: Option<Vec<TableFormat>>,

    /// Decimal places for reported file sizes
    #[arg(long)]
    decimals: Option<u32>,

    /// Clock for write/read timings (wall = elapsed, cpu = process CPU time)
    #[arg(long, value_enum)]
    timer: Option<Timer>,

    #[arg(long, value_enum)]
    feather_compression: Option<FeatherCompression>,

    /// Write CSV floats with a fixed number of fractional digits
    #[arg(long, value_name = "DIGITS")]
    csv_float_precision: Option<usize>,

    /// Check that each decoded file matches the generated table
    #[arg(long)]
    verify: bool,

    /// Include SHA-256 digests of the written files in the report
    #[arg(long)]
    checksums: bool,

    /// Delete the written files afterwards
    #[arg(long)]
    cleanup: bool,

    /// How the comparison is printed on stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rows: self.rows,
            columns: self.columns,
            seed: self.seed,
            output_dir: self.output_dir.clone(),
            formats: self.formats.clone(),
            decimals: self.decimals,
            timer: self.timer,
            feather_compression: self.feather_compression,
            csv_float_precision: self.csv_float_precision,
            verify: self.verify,
            checksums: self.checksums,
            cleanup: self.cleanup,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI args first
    let cli = Cli::parse();

    // Determine default log level
    let default_level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // FEATHER_BENCH_LOG > CLI args
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("FEATHER_BENCH_LOG")
        .from_env_lossy();

    let run_id = Uuid::new_v4();

    match cli.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .with_span_list(false)
                .with_current_span(false)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    // Root span with run_id
    let _span = tracing::info_span!("root", run_id = %run_id).entered();

    match &cli.command {
        Commands::Run(args) => {
            let mut config = match &args.config {
                Some(path) => {
                    tracing::info!("Loading benchmark config from {:?}", path);
                    BenchConfig::from_path(path)?
                }
                None => BenchConfig::default(),
            };
            config.apply_overrides(args.overrides());

            let report = feather_bench::runner::run_benchmark(&config, run_id)?;
            match args.report {
                ReportFormat::Text => println!("{}", report),
                ReportFormat::Json => println!("{}", report.to_json()?),
            }
        }
    }

    Ok(())
}
