use approx::assert_relative_eq;
use brent_forecast::align::CombinedRecord;
use brent_forecast::correlation::{correlate, correlate_records, linear_fit, rate_on_price_fit};
use brent_forecast::ForecastError;
use chrono::NaiveDate;

#[test]
fn test_self_correlation_is_one() {
    let x = vec![71.2, 74.8, 69.9, 80.1, 77.3, 82.6, 79.0];
    let report = correlate(&x, &x).unwrap();

    assert_relative_eq!(report.pearson_r.unwrap(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(report.spearman_r.unwrap(), 1.0, epsilon = 1e-12);
    assert!(report.pearson_p.unwrap() < 1e-6);
    assert_eq!(report.n, x.len());
}

#[test]
fn test_monotone_but_nonlinear() {
    let x: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| v.powi(3)).collect();
    let report = correlate(&x, &y).unwrap();

    assert_relative_eq!(report.spearman_r.unwrap(), 1.0, epsilon = 1e-12);
    assert!(report.pearson_r.unwrap() < 1.0);
    assert!(report.pearson_r.unwrap() > 0.9);
}

#[test]
fn test_incomplete_pairs_are_dropped() {
    let x = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
    let y = vec![2.0, 4.0, 6.0, f64::NAN, 10.0];
    let report = correlate(&x, &y).unwrap();

    assert_eq!(report.n, 3);
    assert_relative_eq!(report.pearson_r.unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_constant_input_has_no_coefficient() {
    let report = correlate(&[1.0, 2.0, 3.0, 4.0], &[5.0, 5.0, 5.0, 5.0]).unwrap();

    assert_eq!(report.pearson_r, None);
    assert_eq!(report.spearman_r, None);
}

#[test]
fn test_empty_and_mismatched_input() {
    assert!(matches!(correlate(&[], &[]), Err(ForecastError::EmptyInputError(_))));
    assert!(matches!(
        correlate(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::EmptyInputError(_))
    ));
}

#[test]
fn test_linear_fit() {
    let x = vec![60.0, 70.0, 80.0, 90.0];
    let y: Vec<f64> = x.iter().map(|p| 2.5 + 0.03 * p).collect();
    let fit = linear_fit(&x, &y).unwrap();

    assert_relative_eq!(fit.slope, 0.03, epsilon = 1e-10);
    assert_relative_eq!(fit.intercept, 2.5, epsilon = 1e-8);
    assert_relative_eq!(fit.r_squared.unwrap(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_records_skip_missing_rates() {
    let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    let records = vec![
        CombinedRecord { date: day(1), price: 80.0, rate: Some(5.0) },
        CombinedRecord { date: day(2), price: 82.0, rate: None },
        CombinedRecord { date: day(3), price: 84.0, rate: Some(5.2) },
        CombinedRecord { date: day(6), price: 83.0, rate: Some(5.15) },
    ];

    let report = correlate_records(&records).unwrap();
    assert_eq!(report.n, 3);
    // Complete pairs lie on rate = 1.0 + 0.05 * price
    assert_relative_eq!(report.pearson_r.unwrap(), 1.0, epsilon = 1e-9);

    let fit = rate_on_price_fit(&records).unwrap();
    assert_eq!(fit.n, 3);
    assert_relative_eq!(fit.slope, 0.05, epsilon = 1e-9);
}
