//! # Brent Forecast
//!
//! Analysis of the Brent crude oil price against the BRL/USD exchange rate.
//!
//! ## Features
//!
//! - Loading of `;`-delimited, Windows-1252, decimal-comma daily series
//! - Date alignment of two series (inner or left join)
//! - Rolling z-score outlier detection annotated with historical market events
//! - Pearson and Spearman correlation with p-values, plus an OLS line
//! - Additive trend + seasonality forecasting with changepoints and uncertainty bands
//! - RMSE / MAE / MAPE evaluation on a held-out window
//! - Model persistence and polars data frame export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brent_forecast::config::AnalysisConfig;
//! use brent_forecast::pipeline::load_and_analyze;
//!
//! let config = AnalysisConfig::default();
//! let report = load_and_analyze("brent.csv", "cambio.csv", &config)?;
//!
//! if let Some(metrics) = &report.metrics {
//!     println!("{}", metrics);
//! }
//! for changepoint in &report.changepoints {
//!     println!("{}: {:+.4} per day", changepoint.date, changepoint.slope_change_per_day);
//! }
//! report.model.save("brent_model.bin")?;
//! # Ok::<(), brent_forecast::ForecastError>(())
//! ```

pub mod align;
pub mod config;
pub mod correlation;
pub mod data;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod models;
pub mod outliers;
pub mod pipeline;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use crate::align::{align, CombinedRecord, JoinMode};
pub use crate::config::AnalysisConfig;
pub use crate::correlation::{correlate, CorrelationReport};
pub use crate::data::{CsvFormat, Observation, Series, SeriesLoader};
pub use crate::error::{ForecastError, Result};
pub use crate::metrics::{evaluate, EvaluationMetrics};
pub use crate::models::{
    AdditiveModel, Forecast, ForecastModel, ForecastPoint, ModelConfig, TrainedAdditiveModel,
    TrainedForecastModel,
};
pub use crate::outliers::{detect, OutlierDetector, OutlierReport};
pub use crate::pipeline::{load_and_analyze, run_analysis, AnalysisReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
