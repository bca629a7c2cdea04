use brent_forecast::config::AnalysisConfig;
use brent_forecast::pipeline::load_and_analyze;
use dotenv::dotenv;
use log::{info, warn};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let price_path = env::var("PRICE_CSV").map_err(|_| "PRICE_CSV must be set")?;
    let rate_path = env::var("RATE_CSV").map_err(|_| "RATE_CSV must be set")?;

    let config = match env::var("ANALYSIS_CONFIG") {
        Ok(path) => {
            info!("Reading configuration from {}", path);
            AnalysisConfig::from_json_file(&path)?
        }
        Err(_) => {
            info!("ANALYSIS_CONFIG not set, using defaults");
            AnalysisConfig::default()
        }
    };

    let report = load_and_analyze(&price_path, &rate_path, &config)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(metrics) = &report.metrics {
        eprintln!("{}", metrics);
    }
    for warning in &report.forecast.warnings {
        warn!("{}", warning);
    }

    match env::var("MODEL_OUT") {
        Ok(path) => {
            report.model.save(&path)?;
            info!("Saved model to {}", path);
        }
        Err(_) => info!("MODEL_OUT not set, model not saved"),
    }

    Ok(())
}
