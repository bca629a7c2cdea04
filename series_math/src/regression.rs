//! Ordinary least squares trend lines

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; undefined when `y` is constant
    pub r_squared: Option<f64>,
    /// Number of pairs used
    pub n: usize,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y` on `x` by ordinary least squares
pub fn ols_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Paired samples differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(
            "Linear regression needs at least 2 points".to_string(),
        ));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        numerator += (xi - x_mean) * (yi - y_mean);
        denominator += (xi - x_mean) * (xi - x_mean);
    }

    if denominator.abs() < 1e-12 {
        return Err(MathError::CalculationError(
            "Cannot calculate slope: x values are constant".to_string(),
        ));
    }

    let slope = numerator / denominator;
    let intercept = y_mean - slope * x_mean;

    let ss_tot: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (yi - (slope * xi + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        Some((1.0 - ss_res / ss_tot).clamp(0.0, 1.0))
    } else {
        None
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        n: x.len(),
    })
}
