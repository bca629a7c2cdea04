use brent_forecast::data::Series;
use brent_forecast::outliers::{detect, EventCatalog, OutlierDetector, NO_EVENT_LABEL};
use brent_forecast::ForecastError;
use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn daily_series(start: NaiveDate, values: Vec<f64>) -> Series {
    let dates = (0..values.len())
        .map(|i| start + Duration::days(i as i64))
        .collect();
    Series::new(dates, values).unwrap()
}

#[test]
fn test_constant_series_has_no_outliers() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let series = daily_series(start, vec![50.0; 40]);

    let report = detect(&series, 12, 2.0).unwrap();

    assert_eq!(report.outlier_count(), 0);
    assert_eq!(report.annotations.len(), 40 - 12);
    assert_eq!(report.excluded_edge_points, 12);
    assert_eq!(report.zero_variance_points, report.annotations.len());
    assert!(report.annotations.iter().all(|a| a.z_score.is_none()));
}

#[test]
fn test_spike_is_flagged_and_labelled() {
    // Spike placed on the first day of the 2020 price war
    let start = NaiveDate::from_ymd_opt(2020, 2, 20).unwrap();
    let spike_date = NaiveDate::from_ymd_opt(2020, 3, 9).unwrap();
    let spike_idx = (spike_date - start).num_days() as usize;

    let mut values = vec![50.0; 40];
    values[spike_idx] = 80.0;
    let series = daily_series(start, values);

    let report = detect(&series, 12, 2.0).unwrap();
    let outliers: Vec<_> = report.outliers().collect();

    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].date, spike_date);
    assert!(outliers[0].z_score.unwrap() > 3.0);
    assert!(outliers[0].event_label.is_some());
    assert_ne!(outliers[0].label_or_default(), NO_EVENT_LABEL);

    // Neighbours whose window contains the spike get a small negative score
    let neighbour = report
        .annotations
        .iter()
        .find(|a| a.date == spike_date + Duration::days(1))
        .unwrap();
    assert!(!neighbour.is_outlier);
    assert!(neighbour.z_score.unwrap() < 0.0);
}

#[test]
fn test_unlabelled_outlier_uses_placeholder() {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let mut values = vec![70.0; 30];
    values[15] = 95.0;
    let series = daily_series(start, values);

    let detector = OutlierDetector::new(12, 2.0)
        .unwrap()
        .with_catalog(EventCatalog::new());
    let report = detector.detect(&series).unwrap();
    let outlier = report.outliers().next().unwrap();

    assert_eq!(outlier.event_label, None);
    assert_eq!(outlier.label_or_default(), NO_EVENT_LABEL);
}

#[test]
fn test_edges_excluded_symmetrically() {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
    let values: Vec<f64> = (0..20).map(|i| 60.0 + (i % 5) as f64).collect();
    let series = daily_series(start, values);

    let report = detect(&series, 12, 2.0).unwrap();
    let evaluated: Vec<i64> = report
        .annotations
        .iter()
        .map(|a| (a.date - start).num_days())
        .collect();

    // Half a window (6 points) is dropped at each end
    assert_eq!(evaluated, (6..14).collect::<Vec<i64>>());
    assert_eq!(report.excluded_edge_points, 12);
}

#[test]
fn test_short_series_has_no_annotations() {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    let series = daily_series(start, vec![1.0, 2.0, 3.0]);

    let report = detect(&series, 12, 2.0).unwrap();

    assert!(report.annotations.is_empty());
    assert_eq!(report.excluded_edge_points, 3);
}

#[rstest]
#[case(1, 2.0)]
#[case(12, 0.0)]
#[case(12, f64::NAN)]
fn test_invalid_parameters(#[case] window: usize, #[case] threshold: f64) {
    let result = OutlierDetector::new(window, threshold);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_historical_catalog() {
    let catalog = EventCatalog::historical();
    assert!(!catalog.is_empty());
    assert!(catalog
        .lookup(NaiveDate::from_ymd_opt(2020, 3, 9).unwrap())
        .is_some());
    assert_eq!(catalog.lookup(NaiveDate::from_ymd_opt(2020, 3, 10).unwrap()), None);
}
