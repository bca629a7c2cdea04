//! Forecasting models for time series data

use crate::data::Series;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod additive;
pub mod seasonality;

pub use additive::{AdditiveModel, ModelConfig, TrainedAdditiveModel};

/// Forecast for one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Observed value, when the date belongs to a test window
    pub actual: Option<f64>,
    pub predicted: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub trend: f64,
    pub seasonal_weekly: f64,
    pub seasonal_yearly: f64,
}

/// A date where the fitted trend changes slope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Changepoint {
    pub date: NaiveDate,
    /// Slope change on the model's internal scale
    pub delta: f64,
    /// Slope change in series units per day
    pub slope_change_per_day: f64,
}

/// Non-fatal condition raised while forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForecastWarning {
    /// Date lies further from the training window than the configured limit;
    /// the trend is still extrapolated linearly
    DateRange {
        date: NaiveDate,
        distance_days: i64,
        limit_days: i64,
    },
}

impl std::fmt::Display for ForecastWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastWarning::DateRange {
                date,
                distance_days,
                limit_days,
            } => write!(
                f,
                "{} is {} days outside the training range (limit {})",
                date, distance_days, limit_days
            ),
        }
    }
}

/// Points produced by one prediction call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub points: Vec<ForecastPoint>,
    pub warnings: Vec<ForecastWarning>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn predicted(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted).collect()
    }

    /// Turn the first date-range warning into a [`ForecastError::DateRangeError`]
    pub fn strict(self) -> Result<Self> {
        match self.warnings.first() {
            Some(warning) => Err(ForecastError::DateRangeError(warning.to_string())),
            None => Ok(self),
        }
    }

    /// Attach observed values by date
    pub fn with_actuals(mut self, actual: &Series) -> Self {
        for point in &mut self.points {
            point.actual = actual.get(point.date);
        }
        self
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict the given dates
    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast>;

    /// Changepoints whose slope change is large enough to report
    fn changepoints(&self) -> Vec<Changepoint>;

    /// Name of the model
    fn name(&self) -> &str;

    /// Predict the dates of a test series and attach its values as actuals
    fn forecast_test(&self, test: &Series) -> Result<Forecast> {
        Ok(self.predict(&test.dates())?.with_actuals(test))
    }
}

/// Forecast model that can be trained on time series data
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a series
    fn fit(&self, train: &Series) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
