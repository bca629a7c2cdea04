//! Descriptive statistics of a series

use crate::data::Series;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::Summary;

/// Count, moments, quartiles and dated extremes of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, undefined for a single observation
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    /// Earliest date on which the minimum occurs
    pub min_date: NaiveDate,
    /// Earliest date on which the maximum occurs
    pub max_date: NaiveDate,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Summarise a series
pub fn summarize(series: &Series) -> Result<SeriesSummary> {
    let observations = series.observations();
    let (first, last) = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(ForecastError::EmptyInputError(
                "Cannot summarise an empty series".to_string(),
            ))
        }
    };

    let summary = Summary::from_values(&series.values())?;

    Ok(SeriesSummary {
        count: summary.count,
        mean: summary.mean,
        std_dev: summary.std_dev,
        min: summary.min,
        q25: summary.q25,
        median: summary.median,
        q75: summary.q75,
        max: summary.max,
        min_date: observations[summary.argmin].date,
        max_date: observations[summary.argmax].date,
        first_date: first.date,
        last_date: last.date,
    })
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Period: {} to {}", self.first_date, self.last_date)?;
        writeln!(f, "  Count:  {}", self.count)?;
        writeln!(f, "  Mean:   {:.4}", self.mean)?;
        match self.std_dev {
            Some(std) => writeln!(f, "  Std:    {:.4}", std)?,
            None => writeln!(f, "  Std:    undefined")?,
        }
        writeln!(f, "  Min:    {:.4} on {}", self.min, self.min_date)?;
        writeln!(f, "  25%:    {:.4}", self.q25)?;
        writeln!(f, "  50%:    {:.4}", self.median)?;
        writeln!(f, "  75%:    {:.4}", self.q75)?;
        writeln!(f, "  Max:    {:.4} on {}", self.max, self.max_date)?;
        Ok(())
    }
}
