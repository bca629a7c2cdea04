//! Date alignment of the price and exchange-rate series

use crate::data::Series;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which dates survive the join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Dates present in both series
    Inner,
    /// Every primary date; the secondary value may be missing
    #[default]
    Left,
}

/// One aligned date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub date: NaiveDate,
    pub price: f64,
    /// Exchange rate on the same date; `None` only for unmatched left-join dates
    pub rate: Option<f64>,
}

/// Join two series on date, ascending by date.
///
/// Both inputs are already sorted with unique dates, so a single merge pass
/// suffices.
pub fn align(primary: &Series, secondary: &Series, mode: JoinMode) -> Vec<CombinedRecord> {
    let left = primary.observations();
    let right = secondary.observations();
    let mut records = Vec::with_capacity(match mode {
        JoinMode::Inner => left.len().min(right.len()),
        JoinMode::Left => left.len(),
    });

    let mut j = 0;
    for obs in left {
        while j < right.len() && right[j].date < obs.date {
            j += 1;
        }

        let rate = match right.get(j).map(|r| r.date.cmp(&obs.date)) {
            Some(Ordering::Equal) => Some(right[j].value),
            _ => None,
        };

        if rate.is_some() || mode == JoinMode::Left {
            records.push(CombinedRecord {
                date: obs.date,
                price: obs.value,
                rate,
            });
        }
    }

    records
}

/// Complete `(price, rate)` pairs, skipping records without a rate
pub fn paired_values(records: &[CombinedRecord]) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .filter_map(|r| r.rate.map(|rate| (r.price, rate)))
        .unzip()
}
