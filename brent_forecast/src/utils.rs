//! Utility functions for the brent_forecast crate

use crate::data::Series;
use chrono::{Datelike, NaiveDate};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Split a series into training (`date <= cutoff`) and test (`date > cutoff`) parts
pub fn split_at_date(series: &Series, cutoff: NaiveDate) -> (Series, Series) {
    series.split_at_date(cutoff)
}

/// Whole days since 1970-01-01
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}
