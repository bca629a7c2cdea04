//! Analysis configuration

use crate::align::JoinMode;
use crate::data::CsvFormat;
use crate::error::{ForecastError, Result};
use crate::models::ModelConfig;
use crate::outliers::{DEFAULT_THRESHOLD, DEFAULT_WINDOW};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Date column in both source files
pub const DEFAULT_DATE_COLUMN: &str = "DATA";

/// Brent FOB price column
pub const DEFAULT_PRICE_COLUMN: &str = "Preço - petróleo bruto - Brent (FOB)";

/// BRL/USD commercial buying rate column
pub const DEFAULT_RATE_COLUMN: &str = "Taxa de câmbio - R$ / US$ - comercial - compra - média";

/// Parameters of a full analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub date_column: String,
    pub price_column: String,
    pub rate_column: String,
    pub csv: CsvFormat,
    pub outlier_window: usize,
    pub outlier_threshold: f64,
    pub join_mode: JoinMode,
    /// First date kept for modelling
    pub analysis_start: NaiveDate,
    /// Last date kept for modelling
    pub analysis_end: NaiveDate,
    /// Last training date; later observations form the test window
    pub split_date: NaiveDate,
    pub model: ModelConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
            rate_column: DEFAULT_RATE_COLUMN.to_string(),
            csv: CsvFormat::default(),
            outlier_window: DEFAULT_WINDOW,
            outlier_threshold: DEFAULT_THRESHOLD,
            join_mode: JoinMode::default(),
            analysis_start: NaiveDate::from_ymd_opt(2019, 11, 25).unwrap_or_default(),
            analysis_end: NaiveDate::from_ymd_opt(2024, 11, 25).unwrap_or_default(),
            split_date: NaiveDate::from_ymd_opt(2023, 11, 25).unwrap_or_default(),
            model: ModelConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON configuration; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and date ordering
    pub fn validate(&self) -> Result<()> {
        if self.outlier_window < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "outlier_window must be at least 2, got {}",
                self.outlier_window
            )));
        }
        if !(self.outlier_threshold.is_finite() && self.outlier_threshold > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "outlier_threshold must be positive, got {}",
                self.outlier_threshold
            )));
        }
        if self.analysis_start > self.analysis_end {
            return Err(ForecastError::InvalidParameter(format!(
                "analysis_start {} is after analysis_end {}",
                self.analysis_start, self.analysis_end
            )));
        }
        if self.split_date < self.analysis_start || self.split_date >= self.analysis_end {
            return Err(ForecastError::InvalidParameter(format!(
                "split_date {} must fall within [{}, {})",
                self.split_date, self.analysis_start, self.analysis_end
            )));
        }
        self.model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"outlier_window": 20, "model": {"yearly_order": 5}}"#).unwrap();

        assert_eq!(config.outlier_window, 20);
        assert_eq!(config.model.yearly_order, 5);
        assert_eq!(config.model.weekly_order, 3);
        assert_eq!(config.date_column, DEFAULT_DATE_COLUMN);
        assert_eq!(config.join_mode, JoinMode::Left);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_split_outside_window_rejected() {
        let config = AnalysisConfig {
            split_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ForecastError::InvalidParameter(_))));
    }
}
