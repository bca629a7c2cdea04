use brent_forecast::config::{DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN};
use brent_forecast::data::{CsvFormat, Series, SeriesLoader};
use brent_forecast::ForecastError;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Write text to a temp file the way the source system exports it
fn windows_1252_file(text: &str) -> NamedTempFile {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!had_errors);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file
}

#[test]
fn test_load_windows_1252_file() {
    let text = format!(
        "{};{}\n\
         02/01/2024;77,04\n\
         03/01/2024;78,25\n\
         04/01/2024;77,59\n",
        DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN
    );
    let file = windows_1252_file(&text);

    let loader = SeriesLoader::default();
    let (series, report) = loader
        .load_with_report(file.path(), DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN)
        .unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.dates(), vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
    assert_eq!(series.values(), vec![77.04, 78.25, 77.59]);
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_dropped, 0);
}

#[test]
fn test_bad_rows_are_dropped_and_dates_sorted() {
    let text = "DATA;valor\n\
                05/01/2024;10,5\n\
                03/01/2024;\n\
                not a date;11,0\n\
                04/01/2024;abc\n\
                02/01/2024;9,75\n\
                05/01/2024;99,0\n";

    let loader = SeriesLoader::default();
    let (series, report) = loader.parse_str(text, "DATA", "valor").unwrap();

    assert_eq!(series.dates(), vec![date(2024, 1, 2), date(2024, 1, 5)]);
    // First occurrence of a repeated date wins
    assert_eq!(series.get(date(2024, 1, 5)), Some(10.5));
    assert_eq!(report.rows_read, 6);
    assert_eq!(report.rows_dropped, 3);
    assert_eq!(report.duplicate_dates, 1);
}

#[test]
fn test_missing_column() {
    let loader = SeriesLoader::default();
    let result = loader.parse_str("DATA;outra\n02/01/2024;1,0\n", "DATA", "valor");

    assert!(matches!(result, Err(ForecastError::ParseError(_))));
}

#[test]
fn test_missing_file() {
    let loader = SeriesLoader::default();
    let result = loader.load("/definitely/not/here.csv", "DATA", "valor");

    assert!(matches!(result, Err(ForecastError::DataFormatError(_))));
}

#[test]
fn test_empty_file() {
    let file = NamedTempFile::new().unwrap();
    let loader = SeriesLoader::default();
    let result = loader.load(file.path(), "DATA", "valor");

    assert!(matches!(result, Err(ForecastError::DataFormatError(_))));
}

#[test]
fn test_custom_format() {
    let format = CsvFormat {
        delimiter: ',',
        decimal_separator: '.',
        date_format: "%Y-%m-%d".to_string(),
        encoding: "utf-8".to_string(),
    };
    let loader = SeriesLoader::new(format);
    let (series, _) = loader
        .parse_bytes(b"date,close\n2023-01-01,100.5\n2023-01-02,101.25\n", "date", "close")
        .unwrap();

    assert_eq!(series.values(), vec![100.5, 101.25]);
}

#[test]
fn test_series_construction() {
    let dates = vec![date(2023, 1, 3), date(2023, 1, 1), date(2023, 1, 2)];
    let series = Series::new(dates, vec![3.0, 1.0, 2.0]).unwrap();

    assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.first().unwrap().date, date(2023, 1, 1));
    assert_eq!(series.last().unwrap().value, 3.0);

    assert!(Series::new(vec![date(2023, 1, 1)], vec![]).is_err());
    assert!(Series::new(vec![date(2023, 1, 1)], vec![f64::NAN]).is_err());
}

#[test]
fn test_between_and_split() {
    let dates: Vec<NaiveDate> = (1..=10).map(|d| date(2023, 1, d)).collect();
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let series = Series::new(dates, values).unwrap();

    let window = series.between(date(2023, 1, 3), date(2023, 1, 8));
    assert_eq!(window.len(), 6);

    let (train, test) = window.split_at_date(date(2023, 1, 5));
    assert_eq!(train.last().unwrap().date, date(2023, 1, 5));
    assert_eq!(test.first().unwrap().date, date(2023, 1, 6));
    assert_eq!(train.len() + test.len(), window.len());
}

#[test]
fn test_load_from_reader_strips_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("DATA;valor\n02/01/2024;1,5\n".as_bytes());

    let loader = SeriesLoader::default();
    let (series, _) = loader
        .load_from_reader(std::io::Cursor::new(bytes), "DATA", "valor")
        .unwrap();

    assert_eq!(series.values(), vec![1.5]);
}
