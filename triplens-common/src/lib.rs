pub mod config;
pub use config::{
    Config, DisplayConfig, ExportConfig, HexbinConfig, HistogramConfig, TimeSeriesConfig,
    TripColumnsConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("non-finite value {value} at index {index}")]
    NonFiniteInput { index: usize, value: f64 },
    #[error("degenerate range: lower bound {lo} is not below upper bound {hi}")]
    DegenerateRange { lo: f64, hi: f64 },
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("column `{column}` has non-numeric type {data_type}")]
    ColumnType { column: String, data_type: String },
    #[error("schema mismatch between {first} and {other}")]
    SchemaMismatch { first: String, other: String },
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

impl TripLensError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, TripLensError>;
