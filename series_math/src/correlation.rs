//! Correlation coefficients with significance tests
//!
//! Pearson (linear) and Spearman (rank) correlation. Both report a two-sided
//! p-value from the Student-t distribution with `n - 2` degrees of freedom.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// A correlation coefficient together with its significance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationTest {
    /// Coefficient in [-1, 1]; undefined when either sample is constant
    pub coefficient: Option<f64>,
    /// Two-sided p-value; undefined below three pairs or without a coefficient
    pub p_value: Option<f64>,
    /// Number of pairs used
    pub n: usize,
}

fn check_paired(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Paired samples differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(MathError::InsufficientData(
            "Correlation needs at least one pair".to_string(),
        ));
    }
    Ok(())
}

fn pearson_coefficient(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Two-sided p-value of `r` under the null hypothesis of no correlation
fn t_test_p_value(r: f64, n: usize) -> Option<f64> {
    if n < 3 {
        return None;
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;

    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Pearson correlation of two paired samples
pub fn pearson(x: &[f64], y: &[f64]) -> Result<CorrelationTest> {
    check_paired(x, y)?;

    let coefficient = pearson_coefficient(x, y);
    Ok(CorrelationTest {
        coefficient,
        p_value: coefficient.and_then(|r| t_test_p_value(r, x.len())),
        n: x.len(),
    })
}

/// Ranks starting at 1, ties get the average of the ranks they span
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // Positions start..=end share the mean of ranks start+1..=end+1
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        start = end + 1;
    }

    ranks
}

/// Spearman rank correlation of two paired samples
pub fn spearman(x: &[f64], y: &[f64]) -> Result<CorrelationTest> {
    check_paired(x, y)?;
    pearson(&average_ranks(x), &average_ranks(y))
}
