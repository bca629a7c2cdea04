//! Rolling window statistics
//!
//! `RollingWindow` keeps the last `period` values and reports their mean and
//! sample standard deviation. `centered_rolling` slides it over a whole sample
//! and assigns each full window to its center position.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Mean and sample standard deviation of one full window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Fixed-size sliding window over a stream of values
#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingWindow {
    /// Create a new rolling window; the sample standard deviation needs `period >= 2`
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Rolling window period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value, evicting the oldest once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Whether the window holds `period` values
    pub fn is_full(&self) -> bool {
        self.values.len() == self.period
    }

    /// Statistics of the current window
    pub fn stats(&self) -> Result<WindowStats> {
        if !self.is_full() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for rolling statistics. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        let n = self.period as f64;
        // Recompute from the stored values so the running sum cannot drift
        let mean = self.values.iter().sum::<f64>() / n;
        let variance = self
            .values
            .iter()
            .map(|&v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1.0);

        Ok(WindowStats {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Running sum of the values currently held
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Reset the window, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Centered rolling statistics over a whole sample.
///
/// Position `i` gets the statistics of the values covering
/// `[i - period / 2, i + period / 2]`, so an even `period` spans `period + 1`
/// observations. The first and last `period / 2` positions have no complete
/// window and are `None`.
pub fn centered_rolling(values: &[f64], period: usize) -> Result<Vec<Option<WindowStats>>> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Rolling window period must be at least 2".to_string(),
        ));
    }

    let half = period / 2;
    let mut window = RollingWindow::new(2 * half + 1)?;
    let mut result = vec![None; values.len()];

    for (j, &value) in values.iter().enumerate() {
        window.update(value);
        if window.is_full() {
            result[j - half] = Some(window.stats()?);
        }
    }

    Ok(result)
}
