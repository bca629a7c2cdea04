//! Correlation between the price and exchange-rate series

use crate::align::{paired_values, CombinedRecord};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use series_math::{ols_fit, pearson, spearman, LinearFit};

/// Linear and rank correlation of two paired samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub pearson_r: Option<f64>,
    pub pearson_p: Option<f64>,
    pub spearman_r: Option<f64>,
    pub spearman_p: Option<f64>,
    /// Pairs used after dropping incomplete ones
    pub n: usize,
}

/// Drop pairs where either side is missing (NaN)
fn complete_pairs(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return Err(ForecastError::EmptyInputError(format!(
            "Paired samples differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip();

    if xs.is_empty() {
        return Err(ForecastError::EmptyInputError(
            "No complete pairs to correlate".to_string(),
        ));
    }

    Ok((xs, ys))
}

/// Pearson and Spearman coefficients with two-sided p-values
pub fn correlate(x: &[f64], y: &[f64]) -> Result<CorrelationReport> {
    let (xs, ys) = complete_pairs(x, y)?;
    let linear = pearson(&xs, &ys)?;
    let rank = spearman(&xs, &ys)?;

    Ok(CorrelationReport {
        pearson_r: linear.coefficient,
        pearson_p: linear.p_value,
        spearman_r: rank.coefficient,
        spearman_p: rank.p_value,
        n: xs.len(),
    })
}

/// Ordinary least squares line of `y` on `x`
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    let (xs, ys) = complete_pairs(x, y)?;
    Ok(ols_fit(&xs, &ys)?)
}

/// Correlate price with rate over the records that have both
pub fn correlate_records(records: &[CombinedRecord]) -> Result<CorrelationReport> {
    let (prices, rates) = paired_values(records);
    correlate(&prices, &rates)
}

/// Regress rate on price over the records that have both
pub fn rate_on_price_fit(records: &[CombinedRecord]) -> Result<LinearFit> {
    let (prices, rates) = paired_values(records);
    linear_fit(&prices, &rates)
}
