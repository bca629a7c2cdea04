use approx::assert_relative_eq;
use brent_forecast::metrics::{evaluate, evaluate_forecast};
use brent_forecast::models::ForecastPoint;
use brent_forecast::ForecastError;
use chrono::NaiveDate;

#[test]
fn test_perfect_forecast() {
    let metrics = evaluate(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();

    assert_eq!(metrics.rmse, 0.0);
    assert_eq!(metrics.mae, 0.0);
    assert_eq!(metrics.mape, Some(0.0));
    assert_eq!(metrics.n, 3);
}

#[test]
fn test_zero_actuals_are_left_out_of_mape() {
    let metrics = evaluate(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap();
    assert_eq!(metrics.mape, Some(0.0));

    let metrics = evaluate(&[0.0, 10.0, 20.0], &[1.0, 11.0, 18.0]).unwrap();
    // (1/10 + 2/20) / 2
    assert_relative_eq!(metrics.mape.unwrap(), 10.0, epsilon = 1e-10);

    let metrics = evaluate(&[0.0, 0.0], &[1.0, -1.0]).unwrap();
    assert_eq!(metrics.mape, None);
    assert_relative_eq!(metrics.mae, 1.0);
}

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let metrics = evaluate(&actual, &predicted).unwrap();

    assert_relative_eq!(metrics.mae, 2.4, epsilon = 1e-10);
    assert_relative_eq!(metrics.rmse, 30.0_f64.sqrt() / 5.0_f64.sqrt(), epsilon = 1e-10);
    assert!(metrics.mape.unwrap() > 0.0 && metrics.mape.unwrap() < 15.0);
    assert!(metrics.rmse >= metrics.mae);
}

#[test]
fn test_invalid_input() {
    assert!(matches!(evaluate(&[], &[]), Err(ForecastError::EmptyInputError(_))));
    assert!(matches!(
        evaluate(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::EmptyInputError(_))
    ));
}

#[test]
fn test_forecast_points_without_actuals_are_skipped() {
    let point = |d: u32, actual: Option<f64>, predicted: f64| ForecastPoint {
        date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
        actual,
        predicted,
        lower_bound: predicted,
        upper_bound: predicted,
        trend: predicted,
        seasonal_weekly: 0.0,
        seasonal_yearly: 0.0,
    };
    let points = vec![point(1, Some(10.0), 11.0), point(2, None, 50.0), point(3, Some(20.0), 19.0)];

    let metrics = evaluate_forecast(&points).unwrap();
    assert_eq!(metrics.n, 2);
    assert_relative_eq!(metrics.mae, 1.0);
    assert!(evaluate_forecast(&points[1..2]).is_err());
}

#[test]
fn test_display() {
    let metrics = evaluate(&[100.0, 200.0], &[110.0, 190.0]).unwrap();
    let text = metrics.to_string();

    assert!(text.contains("RMSE:  10.00"));
    assert!(text.contains("MAPE:  7.50%"));
}
