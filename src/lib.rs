//! # Brent Insights
//!
//! Workspace facade over the numeric kernels in [`series_math`] and the
//! price/exchange-rate analysis in [`brent_forecast`].
//!
//! ## Example
//!
//! ```
//! use brent_insights::{pearson, Series};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let series = Series::new(vec![day(3), day(1), day(2)], vec![78.0, 76.5, 77.1]).unwrap();
//! assert_eq!(series.first().unwrap().date, day(1));
//!
//! let r = pearson(&series.values(), &[4.9, 4.92, 4.95]).unwrap();
//! assert!(r.coefficient.unwrap() > 0.9);
//! ```

pub use brent_forecast;
pub use series_math;

pub use brent_forecast::{
    align, detect, evaluate, load_and_analyze, run_analysis, AnalysisConfig, AnalysisReport,
    CombinedRecord, EvaluationMetrics, Forecast, ForecastError, ForecastModel, ForecastPoint,
    JoinMode, ModelConfig, Series, SeriesLoader, TrainedAdditiveModel, TrainedForecastModel,
};
pub use series_math::{pearson, spearman, MathError};
