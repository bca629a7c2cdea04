//! End-to-end analysis of the price and exchange-rate series

use crate::align::{align, CombinedRecord};
use crate::config::AnalysisConfig;
use crate::correlation::{correlate_records, rate_on_price_fit, CorrelationReport};
use crate::data::{LoadReport, Series, SeriesLoader};
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate_forecast, EvaluationMetrics};
use crate::models::{
    AdditiveModel, Changepoint, Forecast, ForecastModel, TrainedAdditiveModel,
    TrainedForecastModel,
};
use crate::outliers::{OutlierDetector, OutlierReport};
use crate::stats::{summarize, SeriesSummary};
use log::{info, warn};
use serde::Serialize;
use series_math::LinearFit;
use std::path::Path;

/// Everything produced by one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub price_summary: SeriesSummary,
    pub rate_summary: SeriesSummary,
    pub combined: Vec<CombinedRecord>,
    pub outliers: OutlierReport,
    pub correlation: CorrelationReport,
    /// Rate regressed on price; absent when the pairs cannot support a line
    pub regression: Option<LinearFit>,
    pub train_size: usize,
    pub test_size: usize,
    pub forecast: Forecast,
    /// Absent when the test window is empty
    pub metrics: Option<EvaluationMetrics>,
    pub changepoints: Vec<Changepoint>,
    /// Row accounting of the price file; absent for in-memory input
    pub price_load: Option<LoadReport>,
    /// Row accounting of the rate file; absent for in-memory input
    pub rate_load: Option<LoadReport>,
    #[serde(skip)]
    pub model: TrainedAdditiveModel,
}

/// Run every stage on already loaded series
pub fn run_analysis(price: &Series, rate: &Series, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    let price_summary = summarize(price)?;
    let rate_summary = summarize(rate)?;

    let combined = align(price, rate, config.join_mode);
    info!(
        "Aligned {} price and {} rate observations into {} records",
        price.len(),
        rate.len(),
        combined.len()
    );

    let outliers = OutlierDetector::new(config.outlier_window, config.outlier_threshold)?.detect(price)?;
    info!(
        "Flagged {} price outliers (window {}, threshold {})",
        outliers.outlier_count(),
        outliers.window,
        outliers.threshold
    );

    let correlation = correlate_records(&combined)?;
    info!(
        "Correlation over {} pairs: pearson {:?}, spearman {:?}",
        correlation.n, correlation.pearson_r, correlation.spearman_r
    );
    let regression = match rate_on_price_fit(&combined) {
        Ok(fit) => Some(fit),
        Err(e) => {
            warn!("Skipping rate-on-price regression: {}", e);
            None
        }
    };

    let window = price.between(config.analysis_start, config.analysis_end);
    let (train, test) = window.split_at_date(config.split_date);
    info!(
        "Modelling {} to {}: {} training and {} test observations",
        config.analysis_start,
        config.analysis_end,
        train.len(),
        test.len()
    );

    let model = AdditiveModel::new(config.model.clone())?.fit(&train)?;
    let forecast = model.forecast_test(&test)?;
    let metrics = if forecast.is_empty() {
        None
    } else {
        let metrics = evaluate_forecast(&forecast.points)?;
        info!(
            "Test window: RMSE {:.4}, MAE {:.4}, MAPE {:?}",
            metrics.rmse, metrics.mae, metrics.mape
        );
        Some(metrics)
    };
    let changepoints = model.changepoints();

    Ok(AnalysisReport {
        price_summary,
        rate_summary,
        combined,
        outliers,
        correlation,
        regression,
        train_size: train.len(),
        test_size: test.len(),
        forecast,
        metrics,
        changepoints,
        price_load: None,
        rate_load: None,
        model,
    })
}

/// Load both source files, then run [`run_analysis`]
pub fn load_and_analyze<P, Q>(price_path: P, rate_path: Q, config: &AnalysisConfig) -> Result<AnalysisReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let loader = SeriesLoader::new(config.csv.clone());
    let (price, price_load) =
        loader.load_with_report(price_path, &config.date_column, &config.price_column)?;
    let (rate, rate_load) =
        loader.load_with_report(rate_path, &config.date_column, &config.rate_column)?;

    if price.is_empty() {
        return Err(ForecastError::DataFormatError(
            "Price file contains no usable rows".to_string(),
        ));
    }

    let mut report = run_analysis(&price, &rate, config)?;
    report.price_load = Some(price_load);
    report.rate_load = Some(rate_load);
    Ok(report)
}
