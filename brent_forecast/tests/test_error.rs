use brent_forecast::ForecastError;
use series_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    match ForecastError::from(io_error) {
        ForecastError::IoError(_) => {}
        other => panic!("Expected IoError variant, got {:?}", other),
    }

    let math_error = MathError::InsufficientData("need 3 values".to_string());
    match ForecastError::from(math_error) {
        ForecastError::MathError(MathError::InsufficientData(_)) => {}
        other => panic!("Expected MathError variant, got {:?}", other),
    }

    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    match ForecastError::from(json_error) {
        ForecastError::SerializationError(_) => {}
        other => panic!("Expected SerializationError variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("interval_width must be within (0, 1)".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid parameter: interval_width must be within (0, 1)"
    );

    let error = ForecastError::InsufficientDataError("Need at least 10".to_string());
    assert!(error.to_string().starts_with("Insufficient data"));
}
