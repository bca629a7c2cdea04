//! # Series Math
//!
//! Numeric building blocks for the Brent price / exchange-rate analysis.
//! Everything here works on plain `f64` slices and knows nothing about dates,
//! files or models; the domain crate layers those on top.
//!
//! - Descriptive statistics and quantiles
//! - Centered rolling mean / sample standard deviation
//! - Pearson and Spearman correlation with two-sided p-values
//! - Ordinary least squares trend lines
//! - A small symmetric positive-definite solver for regularised least squares

use thiserror::Error;

pub mod correlation;
pub mod descriptive;
pub mod linalg;
pub mod regression;
pub mod rolling;

pub use correlation::{pearson, spearman, CorrelationTest};
pub use descriptive::{mean, quantile, sample_std_dev, Summary};
pub use linalg::SymmetricSystem;
pub use regression::{ols_fit, LinearFit};
pub use rolling::{centered_rolling, RollingWindow, WindowStats};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
