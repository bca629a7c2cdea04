//! Error types for the brent_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the brent_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Source file missing, unreadable, empty or of the wrong shape
    #[error("Data format error: {0}")]
    DataFormatError(String),

    /// A required column is absent from the source file
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Too few observations to fit a model
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),

    /// Requested dates lie far outside the training range
    #[error("Date range error: {0}")]
    DateRangeError(String),

    /// Empty or length-mismatched input to a metric
    #[error("Empty input: {0}")]
    EmptyInputError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error while (de)serialising a model or configuration
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error from numeric kernels
    #[error("Math error: {0}")]
    MathError(#[from] series_math::MathError),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<bincode::Error> for ForecastError {
    fn from(err: bincode::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}
