//! Fourier seasonal components

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Weekly cycle length in days
pub const WEEKLY_PERIOD: f64 = 7.0;

/// Yearly cycle length in days
pub const YEARLY_PERIOD: f64 = 365.25;

/// A periodic component `Σ aₖ sin(2πkt/P) + bₖ cos(2πkt/P)` over absolute days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourierSeasonality {
    pub name: String,
    /// Cycle length in days
    pub period: f64,
    /// Number of harmonics
    pub order: usize,
}

impl FourierSeasonality {
    pub fn new(name: &str, period: f64, order: usize) -> Self {
        Self {
            name: name.to_string(),
            period,
            order,
        }
    }

    pub fn weekly(order: usize) -> Self {
        Self::new("weekly", WEEKLY_PERIOD, order)
    }

    pub fn yearly(order: usize) -> Self {
        Self::new("yearly", YEARLY_PERIOD, order)
    }

    /// Number of design-matrix columns: one sine and one cosine per harmonic
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Append the feature values at `day` (days since epoch) to `row`
    pub fn push_features(&self, day: f64, row: &mut Vec<f64>) {
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * day / self.period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }

    /// Component value at `day` for fitted coefficients
    pub fn evaluate(&self, day: f64, coefficients: &[f64]) -> f64 {
        let mut features = Vec::with_capacity(self.width());
        self.push_features(day, &mut features);
        features
            .iter()
            .zip(coefficients.iter())
            .map(|(f, c)| f * c)
            .sum()
    }
}
