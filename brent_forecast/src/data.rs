//! Time series data handling
//!
//! [`Series`] is the clean, date-ordered sequence every other component works
//! on. [`SeriesLoader`] builds one from the semicolon-delimited, decimal-comma,
//! Windows-1252 exports the price and exchange-rate sources publish.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// One dated value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered series of observations: ascending, unique dates, finite values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series from parallel date and value vectors.
    ///
    /// Observations are sorted by date; when a date repeats, the first one in
    /// input order is kept.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        let observations = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| Observation::new(date, value))
            .collect();

        Self::from_observations(observations)
    }

    /// Build a series from observations, sorting and dropping repeated dates
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self> {
        if let Some(bad) = observations.iter().find(|o| !o.value.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Non-finite value {} on {}",
                bad.value, bad.date
            )));
        }

        let (series, _) = Self::normalize(observations);
        Ok(series)
    }

    /// Sort stably by date and keep the first of each repeated date.
    /// Returns the series and the number of duplicates discarded.
    fn normalize(mut observations: Vec<Observation>) -> (Self, usize) {
        observations.sort_by_key(|o| o.date);
        let before = observations.len();
        observations.dedup_by_key(|o| o.date);
        let duplicates = before - observations.len();

        (Self { observations }, duplicates)
    }

    /// All observations in date order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterate over the observations
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Dates as a vector
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// Values as a vector
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// First observation, if any
    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    /// Last observation, if any
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Value recorded on `date`
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|idx| self.observations[idx].value)
    }

    /// Observations with `start <= date <= end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let lo = self.observations.partition_point(|o| o.date < start);
        let hi = self.observations.partition_point(|o| o.date <= end);

        Self {
            observations: if lo < hi {
                self.observations[lo..hi].to_vec()
            } else {
                Vec::new()
            },
        }
    }

    /// Split into `(date <= cutoff, date > cutoff)`
    pub fn split_at_date(&self, cutoff: NaiveDate) -> (Self, Self) {
        let idx = self.observations.partition_point(|o| o.date <= cutoff);
        (
            Self {
                observations: self.observations[..idx].to_vec(),
            },
            Self {
                observations: self.observations[idx..].to_vec(),
            },
        )
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Layout of the delimited source files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    /// Field separator
    pub delimiter: char,
    /// Decimal separator used by the numeric column
    pub decimal_separator: char,
    /// `chrono` format string of the date column
    pub date_format: String,
    /// WHATWG encoding label of the file bytes
    pub encoding: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            date_format: "%d/%m/%Y".to_string(),
            encoding: "windows-1252".to_string(),
        }
    }
}

/// Row accounting for one load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Data rows read from the file
    pub rows_read: usize,
    /// Rows dropped for a missing field, a bad date or a bad number
    pub rows_dropped: usize,
    /// Rows dropped because their date was already seen
    pub duplicate_dates: usize,
}

/// Loader for dated value series in delimited text files
#[derive(Debug, Clone, Default)]
pub struct SeriesLoader {
    format: CsvFormat,
}

impl SeriesLoader {
    /// Create a loader for the given file layout
    pub fn new(format: CsvFormat) -> Self {
        Self { format }
    }

    /// File layout this loader expects
    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    /// Load a series from a file
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        date_column: &str,
        value_column: &str,
    ) -> Result<Series> {
        self.load_with_report(path, date_column, value_column)
            .map(|(series, _)| series)
    }

    /// Load a series from a file and report dropped rows
    pub fn load_with_report<P: AsRef<Path>>(
        &self,
        path: P,
        date_column: &str,
        value_column: &str,
    ) -> Result<(Series, LoadReport)> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            ForecastError::DataFormatError(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let (series, report) = self.parse_bytes(&bytes, date_column, value_column)?;
        info!(
            "Loaded {} observations of '{}' from {} ({} rows dropped, {} duplicate dates)",
            series.len(),
            value_column,
            path.display(),
            report.rows_dropped,
            report.duplicate_dates
        );

        Ok((series, report))
    }

    /// Read and parse everything from `reader`
    pub fn load_from_reader<R: Read>(
        &self,
        mut reader: R,
        date_column: &str,
        value_column: &str,
    ) -> Result<(Series, LoadReport)> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes, date_column, value_column)
    }

    /// Parse raw file bytes in the configured encoding
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        date_column: &str,
        value_column: &str,
    ) -> Result<(Series, LoadReport)> {
        let encoding = encoding_rs::Encoding::for_label(self.format.encoding.as_bytes())
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Unknown encoding '{}'",
                    self.format.encoding
                ))
            })?;

        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!(
                "Input contained bytes that are not valid {}; they were replaced",
                encoding.name()
            );
        }

        self.parse_str(&text, date_column, value_column)
    }

    /// Parse already-decoded text
    pub fn parse_str(
        &self,
        text: &str,
        date_column: &str,
        value_column: &str,
    ) -> Result<(Series, LoadReport)> {
        if !self.format.delimiter.is_ascii() {
            return Err(ForecastError::InvalidParameter(format!(
                "Delimiter '{}' must be a single ASCII character",
                self.format.delimiter
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.format.delimiter as u8)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ForecastError::DataFormatError(
                "Input has no header row".to_string(),
            ));
        }

        let find_column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                ForecastError::ParseError(format!(
                    "Column '{}' not found; available columns: {:?}",
                    name,
                    headers.iter().collect::<Vec<_>>()
                ))
            })
        };
        let date_idx = find_column(date_column)?;
        let value_idx = find_column(value_column)?;

        let mut report = LoadReport::default();
        let mut observations = Vec::new();

        for (line, record) in reader.records().enumerate() {
            report.rows_read += 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!("Dropping row {}: {}", line + 2, e);
                    report.rows_dropped += 1;
                    continue;
                }
            };

            match self.parse_row(
                record.get(date_idx).unwrap_or(""),
                record.get(value_idx).unwrap_or(""),
            ) {
                Some(observation) => observations.push(observation),
                None => {
                    debug!("Dropping row {}: {:?}", line + 2, record);
                    report.rows_dropped += 1;
                }
            }
        }

        if report.rows_dropped > 0 {
            warn!(
                "Dropped {} of {} rows with missing or unparseable fields",
                report.rows_dropped, report.rows_read
            );
        }

        let (series, duplicates) = Series::normalize(observations);
        report.duplicate_dates = duplicates;
        if duplicates > 0 {
            warn!("Kept the first of {} repeated dates", duplicates);
        }

        Ok((series, report))
    }

    fn parse_row(&self, date_field: &str, value_field: &str) -> Option<Observation> {
        if date_field.is_empty() || value_field.is_empty() {
            return None;
        }

        let date = NaiveDate::parse_from_str(date_field, &self.format.date_format).ok()?;
        let value = value_field
            .replace(self.format.decimal_separator, ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())?;

        Some(Observation::new(date, value))
    }
}
