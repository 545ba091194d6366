use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code("FBENCH-001"),
        help("Please check your benchmark YAML syntax and structure.")
    )]
    ConfigError(#[source] serde_yaml::Error, #[label("here")] Option<SourceSpan>),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code("FBENCH-002"),
        help("Rows and columns must be positive and formats must be listed once each.")
    )]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code("FBENCH-003"),
        help("Check file paths, permissions and free disk space.")
    )]
    IoError(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    #[diagnostic(
        code("FBENCH-004"),
        help("An error occurred while encoding or decoding a table.")
    )]
    PolarsError(#[from] polars::error::PolarsError),

    #[error("Round-trip verification failed: {0}")]
    #[diagnostic(
        code("FBENCH-005"),
        help("The decoded file does not match the generated table.")
    )]
    VerificationError(String),

    #[error(transparent)]
    #[diagnostic(code("FBENCH-000"))]
    Unknown(#[from] anyhow::Error),
}

pub type BenchResult<T> = Result<T, BenchError>;
