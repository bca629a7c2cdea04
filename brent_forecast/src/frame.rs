//! Tabular export of analysis results as polars data frames

use crate::align::CombinedRecord;
use crate::data::Series;
use crate::error::Result;
use crate::models::ForecastPoint;
use crate::outliers::OutlierReport;
use crate::utils::days_since_epoch;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, DataType, NamedFrom, Series as Column};

/// Date column with the polars `Date` logical type
fn date_column<I>(dates: I) -> Result<Column>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: Vec<i32> = dates
        .into_iter()
        .map(|d| days_since_epoch(d) as i32)
        .collect();
    Ok(Column::new("date", days).cast(&DataType::Date)?)
}

/// `date, <value_name>`
pub fn series_frame(series: &Series, value_name: &str) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        date_column(series.dates())?,
        Column::new(value_name, series.values()),
    ])?;
    Ok(df)
}

/// `date, price, rate`; rate is null where the join left it empty
pub fn combined_frame(records: &[CombinedRecord]) -> Result<DataFrame> {
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    let rates: Vec<Option<f64>> = records.iter().map(|r| r.rate).collect();

    let df = DataFrame::new(vec![
        date_column(records.iter().map(|r| r.date))?,
        Column::new("price", prices),
        Column::new("rate", rates),
    ])?;
    Ok(df)
}

/// One row per evaluated observation
pub fn outlier_frame(report: &OutlierReport) -> Result<DataFrame> {
    let rows = &report.annotations;

    let df = DataFrame::new(vec![
        date_column(rows.iter().map(|a| a.date))?,
        Column::new("value", rows.iter().map(|a| a.value).collect::<Vec<f64>>()),
        Column::new(
            "rolling_mean",
            rows.iter().map(|a| a.rolling_mean).collect::<Vec<f64>>(),
        ),
        Column::new(
            "rolling_std",
            rows.iter().map(|a| a.rolling_std).collect::<Vec<f64>>(),
        ),
        Column::new(
            "z_score",
            rows.iter().map(|a| a.z_score).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "is_outlier",
            rows.iter().map(|a| a.is_outlier).collect::<Vec<bool>>(),
        ),
        Column::new(
            "event",
            rows.iter()
                .map(|a| a.event_label.as_deref())
                .collect::<Vec<Option<&str>>>(),
        ),
    ])?;
    Ok(df)
}

/// `date, actual, prediction, lower_bound, upper_bound, trend, weekly, yearly`
pub fn forecast_frame(points: &[ForecastPoint]) -> Result<DataFrame> {
    let column = |name: &str, f: fn(&ForecastPoint) -> f64| {
        Column::new(name, points.iter().map(f).collect::<Vec<f64>>())
    };

    let df = DataFrame::new(vec![
        date_column(points.iter().map(|p| p.date))?,
        Column::new(
            "actual",
            points.iter().map(|p| p.actual).collect::<Vec<Option<f64>>>(),
        ),
        column("prediction", |p| p.predicted),
        column("lower_bound", |p| p.lower_bound),
        column("upper_bound", |p| p.upper_bound),
        column("trend", |p| p.trend),
        column("weekly", |p| p.seasonal_weekly),
        column("yearly", |p| p.seasonal_yearly),
    ])?;
    Ok(df)
}
