//! Descriptive statistics
//!
//! Count, mean, sample standard deviation, quartiles and extremes of a sample.
//! Quantiles interpolate linearly between order statistics.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Quantile `q` of an ascending-sorted sample using linear interpolation
pub fn quantile(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be within [0, 1], got {}",
            q
        )));
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Summary table of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation, undefined for a single value
    pub std_dev: Option<f64>,
    /// Smallest value
    pub min: f64,
    /// First quartile
    pub q25: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q75: f64,
    /// Largest value
    pub max: f64,
    /// Index of the first occurrence of the minimum
    pub argmin: usize,
    /// Index of the first occurrence of the maximum
    pub argmax: usize,
}

impl Summary {
    /// Summarise a sample of finite values
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot summarise an empty sample".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Sample contains non-finite values".to_string(),
            ));
        }

        let mut argmin = 0;
        let mut argmax = 0;
        for (i, &value) in values.iter().enumerate() {
            if value < values[argmin] {
                argmin = i;
            }
            if value > values[argmax] {
                argmax = i;
            }
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            count: values.len(),
            mean: values.iter().sum::<f64>() / values.len() as f64,
            std_dev: sample_std_dev(values),
            min: sorted[0],
            q25: quantile(&sorted, 0.25)?,
            median: quantile(&sorted, 0.5)?,
            q75: quantile(&sorted, 0.75)?,
            max: sorted[sorted.len() - 1],
            argmin,
            argmax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        // Sample variance is 32 / 7
        assert_relative_eq!(sample_std_dev(&values).unwrap(), (32.0_f64 / 7.0).sqrt());

        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&sorted, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile(&sorted, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile(&sorted, 0.25).unwrap(), 1.75);
        assert_relative_eq!(quantile(&sorted, 1.0).unwrap(), 4.0);
        assert!(quantile(&sorted, 1.5).is_err());
        assert!(quantile(&[], 0.5).is_err());
    }

    #[test]
    fn test_summary() {
        let summary = Summary::from_values(&[3.0, 1.0, 4.0, 1.0, 5.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_relative_eq!(summary.mean, 2.8);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.median, 3.0);
        // First occurrence wins for ties
        assert_eq!(summary.argmin, 1);
        assert_eq!(summary.argmax, 4);

        assert!(Summary::from_values(&[]).is_err());
        assert!(Summary::from_values(&[1.0, f64::NAN]).is_err());
    }
}
