//! Feather vs CSV benchmark: write time, read time and on-disk size of a
//! seeded synthetic table.

pub mod config;
pub mod data;
pub mod errors;
pub mod io;
pub mod observability;
pub mod report;
pub mod runner;

pub use config::{BenchConfig, ConfigOverrides};
pub use errors::{BenchError, BenchResult};
pub use io::TableFormat;
pub use report::ComparisonReport;
