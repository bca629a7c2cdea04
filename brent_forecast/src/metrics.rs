//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use crate::models::ForecastPoint;
use serde::{Deserialize, Serialize};

/// Forecast error metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Absolute Percentage Error over non-zero actuals; `None` if every actual is zero
    pub mape: Option<f64>,
    /// Number of evaluated pairs
    pub n: usize,
}

/// Evaluate forecast accuracy against actual values
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<EvaluationMetrics> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(ForecastError::EmptyInputError(format!(
            "Actual ({}) and predicted ({}) values must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| a - p)
        .collect();

    let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

    // Zero actuals have no percentage error; leave them out of the mean
    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &e)| e.abs() / a.abs())
        .collect();
    let mape = if percentage_errors.is_empty() {
        None
    } else {
        Some(percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64 * 100.0)
    };

    Ok(EvaluationMetrics {
        rmse: mse.sqrt(),
        mae,
        mape,
        n: actual.len(),
    })
}

/// Evaluate the points of a forecast that carry an actual value
pub fn evaluate_forecast(points: &[ForecastPoint]) -> Result<EvaluationMetrics> {
    let (actual, predicted): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter_map(|p| p.actual.map(|a| (a, p.predicted)))
        .unzip();

    evaluate(&actual, &predicted)
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Performance Metrics:")?;
        writeln!(f, "  RMSE:  {:.2}", self.rmse)?;
        writeln!(f, "  MAE:   {:.2}", self.mae)?;
        match self.mape {
            Some(mape) => writeln!(f, "  MAPE:  {:.2}%", mape)?,
            None => writeln!(f, "  MAPE:  undefined")?,
        }
        Ok(())
    }
}
