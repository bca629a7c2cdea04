//! Rolling z-score outlier detection
//!
//! Each observation is compared with the mean and sample standard deviation of
//! a centered window around it. Points whose window runs past either end of
//! the series are left out of the report, not reported as inliers. Flagged
//! points are matched, by exact date only, against a catalog of market events.

use crate::data::Series;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use series_math::centered_rolling;
use std::collections::BTreeMap;

/// Rolling window used by the reference analysis
pub const DEFAULT_WINDOW: usize = 12;

/// |z| above which a point is an outlier in the reference analysis
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Text shown for outliers without a catalogued event
pub const NO_EVENT_LABEL: &str = "No event";

/// Dates on which well-known events moved the Brent price
const HISTORICAL_EVENTS: &[(i32, u32, u32, &str)] = &[
    (1990, 8, 2, "Iraq invades Kuwait, start of the Gulf crisis"),
    (1991, 1, 17, "Operation Desert Storm begins"),
    (1997, 10, 27, "Asian financial crisis market crash"),
    (1998, 12, 10, "Oil glut after the Asian crisis, Brent near $10"),
    (2001, 9, 11, "September 11 attacks"),
    (2003, 3, 20, "US-led invasion of Iraq"),
    (2005, 8, 30, "Hurricane Katrina shuts Gulf of Mexico output"),
    (2008, 7, 3, "Brent reaches its all-time high"),
    (2008, 9, 15, "Lehman Brothers collapse"),
    (2011, 2, 17, "Libyan civil war disrupts supply"),
    (2014, 11, 27, "OPEC declines to cut production"),
    (2016, 1, 20, "Brent falls to a 12-year low"),
    (2019, 9, 16, "Drone attack on Abqaiq processing facility"),
    (2020, 3, 9, "OPEC+ breakdown and Saudi-Russia price war"),
    (2020, 4, 21, "COVID-19 demand collapse"),
    (2022, 2, 24, "Russia invades Ukraine"),
    (2022, 3, 8, "US bans Russian oil imports"),
    (2023, 10, 9, "Israel-Hamas war begins"),
];

/// Exact-date lookup table of event descriptions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    events: BTreeMap<NaiveDate, String>,
}

impl EventCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The curated table of historical oil-market events
    pub fn historical() -> Self {
        HISTORICAL_EVENTS
            .iter()
            .filter_map(|&(y, m, d, label)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|date| (date, label.to_string()))
            })
            .collect()
    }

    /// Add or replace the event on `date`
    pub fn insert(&mut self, date: NaiveDate, label: impl Into<String>) {
        self.events.insert(date, label.into());
    }

    /// Event recorded on exactly `date`
    pub fn lookup(&self, date: NaiveDate) -> Option<&str> {
        self.events.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for EventCatalog {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

/// Rolling statistics and classification of one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierAnnotation {
    pub date: NaiveDate,
    pub value: f64,
    pub rolling_mean: f64,
    pub rolling_std: f64,
    /// `(value - rolling_mean) / rolling_std`; `None` when the window has zero variance
    pub z_score: Option<f64>,
    pub is_outlier: bool,
    /// Catalogued event on this date, only filled for outliers
    pub event_label: Option<String>,
}

impl OutlierAnnotation {
    /// Event label, or [`NO_EVENT_LABEL`]
    pub fn label_or_default(&self) -> &str {
        self.event_label.as_deref().unwrap_or(NO_EVENT_LABEL)
    }
}

/// Result of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub window: usize,
    pub threshold: f64,
    /// One entry per observation with a complete window, in date order
    pub annotations: Vec<OutlierAnnotation>,
    /// Observations left out because their window was incomplete
    pub excluded_edge_points: usize,
    /// Observations whose window had zero variance (z-score undefined, never outliers)
    pub zero_variance_points: usize,
}

impl OutlierReport {
    /// Flagged observations
    pub fn outliers(&self) -> impl Iterator<Item = &OutlierAnnotation> {
        self.annotations.iter().filter(|a| a.is_outlier)
    }

    /// Number of flagged observations
    pub fn outlier_count(&self) -> usize {
        self.outliers().count()
    }
}

/// Rolling z-score outlier detector
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    window: usize,
    threshold: f64,
    catalog: EventCatalog,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            threshold: DEFAULT_THRESHOLD,
            catalog: EventCatalog::historical(),
        }
    }
}

impl OutlierDetector {
    /// Create a detector using the historical event catalog
    pub fn new(window: usize, threshold: f64) -> Result<Self> {
        if window < 2 {
            return Err(ForecastError::InvalidParameter(
                "Outlier window must be at least 2".to_string(),
            ));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Outlier threshold must be positive, got {}",
                threshold
            )));
        }

        Ok(Self {
            window,
            threshold,
            catalog: EventCatalog::historical(),
        })
    }

    /// Replace the event catalog
    pub fn with_catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Annotate every observation that has a complete window
    pub fn detect(&self, series: &Series) -> Result<OutlierReport> {
        let values = series.values();
        let stats = centered_rolling(&values, self.window)?;

        let mut annotations = Vec::with_capacity(series.len());
        let mut zero_variance_points = 0;

        for (obs, stats) in series.iter().zip(stats) {
            let Some(stats) = stats else { continue };

            // Identical values can leave rounding residue in the std; treat it as zero
            let z_score = if stats.std_dev > 1e-12 * stats.mean.abs().max(1.0) {
                Some((obs.value - stats.mean) / stats.std_dev)
            } else {
                zero_variance_points += 1;
                None
            };

            let is_outlier = z_score.map_or(false, |z| z.abs() > self.threshold);
            let event_label = if is_outlier {
                self.catalog.lookup(obs.date).map(str::to_string)
            } else {
                None
            };

            annotations.push(OutlierAnnotation {
                date: obs.date,
                value: obs.value,
                rolling_mean: stats.mean,
                rolling_std: stats.std_dev,
                z_score,
                is_outlier,
                event_label,
            });
        }

        let report = OutlierReport {
            window: self.window,
            threshold: self.threshold,
            excluded_edge_points: series.len() - annotations.len(),
            annotations,
            zero_variance_points,
        };
        debug!(
            "Outlier scan: {} evaluated, {} flagged, {} edge points excluded, {} zero-variance",
            report.annotations.len(),
            report.outlier_count(),
            report.excluded_edge_points,
            report.zero_variance_points
        );

        Ok(report)
    }
}

/// Detect outliers with the historical event catalog
pub fn detect(series: &Series, window: usize, threshold: f64) -> Result<OutlierReport> {
    OutlierDetector::new(window, threshold)?.detect(series)
}
