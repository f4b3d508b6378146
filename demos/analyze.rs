//! demos/analyze.rs
//!
//! Fetches a year of hourly temperatures for São Paulo from Open-Meteo and prints
//! the statistics together with the downsampled chart series as JSON.
//!
//! To run this example:
//! cargo run --example analyze

use std::error::Error;

use tempstats::{ErrorResponse, RawTemperatureRequest, TemperatureAnalyzer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let analyzer = TemperatureAnalyzer::open_meteo();

    // The body a caller would POST, taken straight from JSON.
    let raw: RawTemperatureRequest = serde_json::from_str(
        r#"{
            "latitude": -23.5505,
            "longitude": -46.6333,
            "start_date": "2023-01-01",
            "end_date": "2023-12-31"
        }"#,
    )?;

    match analyzer.analyze(&raw).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response.statistics)?);
            println!(
                "{} chart points, first at {}",
                response.temperatures.len(),
                response.timestamps.first().map(String::as_str).unwrap_or("-")
            );
        }
        Err(e) => {
            println!("{} {}", e.status(), serde_json::to_string(&ErrorResponse::from(&e))?);
        }
    }

    Ok(())
}
