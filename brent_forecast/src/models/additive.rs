//! Additive trend + seasonality model
//!
//! The series is decomposed as
//!
//! ```text
//! y(t) = trend(t) + weekly(t) + yearly(t) + noise
//! trend(t) = k·t + m + Σⱼ δⱼ·(t − sⱼ)₊
//! ```
//!
//! on a time axis scaled to `[0, 1]` over the training window and values
//! scaled by their largest magnitude. The `sⱼ` are candidate changepoints
//! spread evenly over the first part of the history. Seasonal components are
//! Fourier series over absolute days.
//!
//! Coefficients are the MAP estimate under Gaussian priors on `k`, `m` and the
//! seasonal terms and a Laplace prior on the slope changes `δ`. The Laplace
//! term is handled by majorise–minimise: every pass replaces `|δ|` with the
//! quadratic `δ² / (2|δ₀|)` around the previous estimate and solves the
//! resulting ridge system, so most `δ` shrink towards zero. The procedure is
//! deterministic.
//!
//! The forecast band comes from two sources of trend uncertainty past the
//! last training date: the posterior spread of the final slope, and future
//! slope changes arriving at the historical changepoint rate with the
//! historical mean magnitude. Its half-width is
//! `z · sqrt(σ_slope²·h² + 2λb²·h³/3)`, which is zero at the last training date
//! and grows with the horizon `h`.

use crate::data::Series;
use crate::error::{ForecastError, Result};
use crate::models::seasonality::FourierSeasonality;
use crate::models::{Changepoint, Forecast, ForecastModel, ForecastPoint, ForecastWarning, TrainedForecastModel};
use crate::utils::days_since_epoch;
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use series_math::SymmetricSystem;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fs;
use std::path::Path;

/// Smallest `|δ₀|` used when reweighting, keeps the penalty finite
const MIN_DELTA_MAGNITUDE: f64 = 1e-6;

/// Floor for the noise variance used in the penalties
const MIN_NOISE_VARIANCE: f64 = 1e-6;

/// Prior standard deviation of the base slope and offset
const TREND_PRIOR_SCALE: f64 = 5.0;

/// Hyperparameters of the additive model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Maximum number of candidate changepoints
    pub n_changepoints: usize,
    /// Fraction of the history in which changepoints are placed
    pub changepoint_range: f64,
    /// Scale of the Laplace prior on slope changes
    pub changepoint_prior_scale: f64,
    /// Standard deviation of the Gaussian prior on seasonal coefficients
    pub seasonality_prior_scale: f64,
    /// Fourier order of the weekly component, 0 disables it
    pub weekly_order: usize,
    /// Fourier order of the yearly component, 0 disables it
    pub yearly_order: usize,
    /// Coverage of the uncertainty band
    pub interval_width: f64,
    /// Smallest `|δ|` reported as a changepoint
    pub changepoint_threshold: f64,
    /// Fewest training observations accepted by `fit`
    pub min_training_points: usize,
    /// Dates further than this multiple of the training span are flagged
    pub max_horizon_ratio: f64,
    /// Reweighting passes for the Laplace prior
    pub max_iterations: usize,
    /// Largest coefficient change at convergence
    pub tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            weekly_order: 3,
            yearly_order: 10,
            interval_width: 0.8,
            changepoint_threshold: 0.01,
            min_training_points: 10,
            max_horizon_ratio: 1.0,
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

impl ModelConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ForecastError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        };

        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_range must be within (0, 1], got {}",
                self.changepoint_range
            )));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval_width must be within (0, 1), got {}",
                self.interval_width
            )));
        }
        positive("changepoint_prior_scale", self.changepoint_prior_scale)?;
        positive("seasonality_prior_scale", self.seasonality_prior_scale)?;
        positive("max_horizon_ratio", self.max_horizon_ratio)?;
        positive("tolerance", self.tolerance)?;
        if !(self.changepoint_threshold >= 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_threshold must be non-negative, got {}",
                self.changepoint_threshold
            )));
        }
        if self.min_training_points < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_training_points must be at least 2".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Untrained additive model
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    name: String,
    config: ModelConfig,
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            name: "Additive trend + seasonality".to_string(),
            config: ModelConfig::default(),
        }
    }
}

impl AdditiveModel {
    /// Create a model with the given hyperparameters
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

/// Layout of the design matrix: `[m, k, δ₁..δₛ, weekly.., yearly..]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Design {
    start_day: f64,
    span_days: f64,
    changepoints_t: Vec<f64>,
    weekly: Option<FourierSeasonality>,
    yearly: Option<FourierSeasonality>,
}

impl Design {
    fn weekly_width(&self) -> usize {
        self.weekly.as_ref().map_or(0, |s| s.width())
    }

    fn yearly_width(&self) -> usize {
        self.yearly.as_ref().map_or(0, |s| s.width())
    }

    fn dim(&self) -> usize {
        2 + self.changepoints_t.len() + self.weekly_width() + self.yearly_width()
    }

    fn scaled_time(&self, day: f64) -> f64 {
        (day - self.start_day) / self.span_days
    }

    fn row(&self, day: f64) -> Vec<f64> {
        let t = self.scaled_time(day);
        let mut row = Vec::with_capacity(self.dim());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints_t.iter().map(|&s| (t - s).max(0.0)));
        if let Some(weekly) = &self.weekly {
            weekly.push_features(day, &mut row);
        }
        if let Some(yearly) = &self.yearly {
            yearly.push_features(day, &mut row);
        }
        row
    }
}

/// Evenly spaced changepoint positions over the first `range` of the rows
fn changepoint_indices(n: usize, max_changepoints: usize, range: f64) -> Vec<usize> {
    let hist_size = (n as f64 * range).floor() as usize;
    if hist_size < 2 {
        return Vec::new();
    }

    let count = max_changepoints.min(hist_size - 1);
    if count == 0 {
        return Vec::new();
    }

    // Position 0 is the trend origin, not a changepoint
    (1..=count)
        .map(|i| (i as f64 * (hist_size - 1) as f64 / count as f64).round() as usize)
        .collect()
}

/// Fitted additive model, immutable once trained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedAdditiveModel {
    name: String,
    config: ModelConfig,
    design: Design,
    start_date: NaiveDate,
    end_date: NaiveDate,
    changepoint_dates: Vec<NaiveDate>,
    y_scale: f64,
    offset: f64,
    slope: f64,
    deltas: Vec<f64>,
    weekly_coefficients: Vec<f64>,
    yearly_coefficients: Vec<f64>,
    /// Residual standard deviation on the internal scale
    sigma_obs: f64,
    /// Posterior standard deviation of the final slope on the internal scale
    final_slope_std: f64,
    training_points: usize,
    iterations: usize,
    converged: bool,
}

impl ForecastModel for AdditiveModel {
    type Trained = TrainedAdditiveModel;

    fn fit(&self, train: &Series) -> Result<Self::Trained> {
        let config = &self.config;
        let n = train.len();
        if n < config.min_training_points {
            return Err(ForecastError::InsufficientDataError(format!(
                "Need at least {} training observations, got {}",
                config.min_training_points, n
            )));
        }

        let observations = train.observations();
        let (start_date, end_date) = (observations[0].date, observations[n - 1].date);
        let days: Vec<f64> = observations
            .iter()
            .map(|o| days_since_epoch(o.date) as f64)
            .collect();
        let span_days = days[n - 1] - days[0];
        if span_days <= 0.0 {
            return Err(ForecastError::InsufficientDataError(
                "Training observations must span more than one date".to_string(),
            ));
        }

        let y_scale = observations
            .iter()
            .map(|o| o.value.abs())
            .fold(0.0, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let y: Vec<f64> = observations.iter().map(|o| o.value / y_scale).collect();

        let cp_indices = changepoint_indices(n, config.n_changepoints, config.changepoint_range);
        let changepoint_dates: Vec<NaiveDate> =
            cp_indices.iter().map(|&i| observations[i].date).collect();
        let changepoints_t: Vec<f64> = cp_indices
            .iter()
            .map(|&i| (days[i] - days[0]) / span_days)
            .collect();

        let min_gap = days
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(f64::INFINITY, f64::min);
        let weekly = if config.weekly_order == 0 {
            None
        } else if span_days < 14.0 || min_gap >= 7.0 {
            warn!(
                "Disabling weekly seasonality: {} days of history with a minimum spacing of {} days",
                span_days, min_gap
            );
            None
        } else {
            Some(FourierSeasonality::weekly(config.weekly_order))
        };
        let yearly = if config.yearly_order == 0 {
            None
        } else if span_days < 730.0 {
            warn!(
                "Disabling yearly seasonality: {} days of history, need two years",
                span_days
            );
            None
        } else {
            Some(FourierSeasonality::yearly(config.yearly_order))
        };

        let design = Design {
            start_day: days[0],
            span_days,
            changepoints_t,
            weekly,
            yearly,
        };
        let dim = design.dim();
        let n_cp = design.changepoints_t.len();
        debug!(
            "Fitting {} observations with {} coefficients ({} changepoints)",
            n, dim, n_cp
        );

        let mut system = SymmetricSystem::new(dim)?;
        for (&day, &target) in days.iter().zip(y.iter()) {
            system.add_row(&design.row(day), target)?;
        }

        let y_mean = y.iter().sum::<f64>() / n as f64;
        let mut noise_var = (y.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>() / n as f64)
            .max(MIN_NOISE_VARIANCE);
        let mut delta_magnitudes = vec![config.changepoint_prior_scale; n_cp];
        let mut beta = vec![0.0; dim];
        let mut iterations = 0;
        let mut converged = false;

        let penalties = |noise_var: f64, delta_magnitudes: &[f64]| {
            let mut penalties = Vec::with_capacity(dim);
            penalties.push(noise_var / TREND_PRIOR_SCALE.powi(2));
            penalties.push(noise_var / TREND_PRIOR_SCALE.powi(2));
            penalties.extend(delta_magnitudes.iter().map(|&d| {
                noise_var / (config.changepoint_prior_scale * d.max(MIN_DELTA_MAGNITUDE))
            }));
            penalties.resize(dim, noise_var / config.seasonality_prior_scale.powi(2));
            penalties
        };

        while iterations < config.max_iterations {
            iterations += 1;
            let next = system
                .with_ridge(&penalties(noise_var, &delta_magnitudes))?
                .solve()?;

            let change = next
                .iter()
                .zip(beta.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            beta = next;

            let sse: f64 = days
                .iter()
                .zip(y.iter())
                .map(|(&day, &target)| {
                    let fitted: f64 = design.row(day).iter().zip(beta.iter()).map(|(x, b)| x * b).sum();
                    (target - fitted).powi(2)
                })
                .sum();
            noise_var = (sse / n as f64).max(MIN_NOISE_VARIANCE);
            delta_magnitudes = beta[2..2 + n_cp].iter().map(|d| d.abs()).collect();

            if change < config.tolerance {
                converged = true;
                break;
            }
        }
        if !converged {
            warn!(
                "Reweighting stopped after {} iterations without reaching tolerance {}",
                iterations, config.tolerance
            );
        }

        let residual_var = days
            .iter()
            .zip(y.iter())
            .map(|(&day, &target)| {
                let fitted: f64 = design.row(day).iter().zip(beta.iter()).map(|(x, b)| x * b).sum();
                (target - fitted).powi(2)
            })
            .sum::<f64>()
            / n as f64;

        // Final slope is k + Σδ; its variance is σ² cᵀ A⁻¹ c
        let factor = system
            .with_ridge(&penalties(noise_var, &delta_magnitudes))?
            .factor()?;
        let mut slope_selector = vec![0.0; dim];
        for entry in slope_selector.iter_mut().skip(1).take(1 + n_cp) {
            *entry = 1.0;
        }
        let final_slope_std = (noise_var * factor.inverse_quadratic(&slope_selector)?).sqrt();

        let weekly_width = design.weekly_width();
        let seasonal_start = 2 + n_cp;
        let model = TrainedAdditiveModel {
            name: self.name.clone(),
            config: config.clone(),
            start_date,
            end_date,
            changepoint_dates,
            y_scale,
            offset: beta[0],
            slope: beta[1],
            deltas: beta[2..seasonal_start].to_vec(),
            weekly_coefficients: beta[seasonal_start..seasonal_start + weekly_width].to_vec(),
            yearly_coefficients: beta[seasonal_start + weekly_width..].to_vec(),
            design,
            sigma_obs: residual_var.sqrt(),
            final_slope_std,
            training_points: n,
            iterations,
            converged,
        };

        info!(
            "Fitted {} on {} observations ({} to {}): residual std {:.4}, {} of {} changepoints active",
            model.name,
            n,
            start_date,
            end_date,
            model.residual_std(),
            model.changepoints().len(),
            n_cp
        );

        Ok(model)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedAdditiveModel {
    /// First training date
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last training date
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Number of observations the model was trained on
    pub fn training_points(&self) -> usize {
        self.training_points
    }

    /// Reweighting passes used by the fit
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether reweighting reached the tolerance before `max_iterations`
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// In-sample residual standard deviation in series units
    pub fn residual_std(&self) -> f64 {
        self.sigma_obs * self.y_scale
    }

    /// Whether each seasonal component survived the history-length checks
    pub fn has_weekly(&self) -> bool {
        self.design.weekly.is_some()
    }

    pub fn has_yearly(&self) -> bool {
        self.design.yearly.is_some()
    }

    /// Every candidate changepoint date, active or not
    pub fn candidate_changepoints(&self) -> &[NaiveDate] {
        &self.changepoint_dates
    }

    fn trend_at(&self, t: f64) -> f64 {
        let hinge: f64 = self
            .design
            .changepoints_t
            .iter()
            .zip(self.deltas.iter())
            .map(|(&s, &d)| d * (t - s).max(0.0))
            .sum();
        self.offset + self.slope * t + hinge
    }

    fn band_half_width(&self, horizon: f64, z: f64) -> f64 {
        if horizon <= 0.0 {
            return 0.0;
        }

        let rate = self.deltas.len() as f64;
        let mean_abs_delta = if self.deltas.is_empty() {
            0.0
        } else {
            self.deltas.iter().map(|d| d.abs()).sum::<f64>() / self.deltas.len() as f64
        };
        let variance = self.final_slope_std.powi(2) * horizon.powi(2)
            + 2.0 * rate * mean_abs_delta.powi(2) * horizon.powi(3) / 3.0;

        z * variance.sqrt() * self.y_scale
    }

    /// Serialise the fitted parameters
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a model from [`to_bytes`](Self::to_bytes) output
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Save the model to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Load a model saved with [`save`](Self::save)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl TrainedForecastModel for TrainedAdditiveModel {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.config.interval_width / 2.0);

        let start_day = days_since_epoch(self.start_date);
        let end_day = days_since_epoch(self.end_date);
        let limit_days = (self.design.span_days * self.config.max_horizon_ratio).round() as i64;

        let mut forecast = Forecast::default();
        for &date in dates {
            let day = days_since_epoch(date);
            let distance_days = (day - end_day).max(start_day - day).max(0);
            if distance_days > limit_days {
                let warning = ForecastWarning::DateRange {
                    date,
                    distance_days,
                    limit_days,
                };
                warn!("{}; extrapolating the trend", warning);
                forecast.warnings.push(warning);
            }

            let day = day as f64;
            let t = self.design.scaled_time(day);
            let trend = self.trend_at(t) * self.y_scale;
            let seasonal_weekly = self
                .design
                .weekly
                .as_ref()
                .map_or(0.0, |s| s.evaluate(day, &self.weekly_coefficients))
                * self.y_scale;
            let seasonal_yearly = self
                .design
                .yearly
                .as_ref()
                .map_or(0.0, |s| s.evaluate(day, &self.yearly_coefficients))
                * self.y_scale;

            let predicted = trend + seasonal_weekly + seasonal_yearly;
            let horizon = (t - 1.0).max(0.0);
            let half_width = self.band_half_width(horizon, z);

            forecast.points.push(ForecastPoint {
                date,
                actual: None,
                predicted,
                lower_bound: predicted - half_width,
                upper_bound: predicted + half_width,
                trend,
                seasonal_weekly,
                seasonal_yearly,
            });
        }

        Ok(forecast)
    }

    fn changepoints(&self) -> Vec<Changepoint> {
        self.changepoint_dates
            .iter()
            .zip(self.deltas.iter())
            .filter(|(_, d)| d.abs() > self.config.changepoint_threshold)
            .map(|(&date, &delta)| Changepoint {
                date,
                delta,
                slope_change_per_day: delta * self.y_scale / self.design.span_days,
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changepoint_indices() {
        // 100 rows, 80 in range, 25 candidates spread over indices 1..=79
        let indices = changepoint_indices(100, 25, 0.8);
        assert_eq!(indices.len(), 25);
        assert_eq!(*indices.last().unwrap(), 79);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert!(indices[0] > 0);

        // Short histories get fewer candidates
        assert_eq!(changepoint_indices(10, 25, 0.8).len(), 7);
        assert!(changepoint_indices(2, 25, 0.8).is_empty());
    }

    #[test]
    fn test_config_validation() {
        assert!(ModelConfig::default().validate().is_ok());

        let bad = ModelConfig {
            interval_width: 1.5,
            ..ModelConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = ModelConfig {
            changepoint_prior_scale: 0.0,
            ..ModelConfig::default()
        };
        assert!(AdditiveModel::new(bad).is_err());
    }
}
