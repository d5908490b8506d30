//! Loads forecast and measurement collections from JSON files.
//!
//! Each file holds a JSON array of records in the upstream wire shape. Any
//! malformed record rejects the whole file.

use crate::aqi::LEVEL_COUNT;
use crate::error::{AppError, Result};
use crate::models::{
    ForecastPoint, ForecastRecord, MeasurementSample, MeasurementSampleRecord, MeasurementSummary,
    MeasurementSummaryRecord,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, error, info};

async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!("Failed to read {}: {}", path.display(), e);
        AppError::from(e)
    })?;
    let records: Vec<T> = serde_json::from_str(&contents).map_err(|e| {
        error!("Failed to parse {}: {}", path.display(), e);
        AppError::from(e)
    })?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn check_level(kind: &str, location: &str, level: u8) -> Result<()> {
    if level as usize > LEVEL_COUNT {
        return Err(AppError::InvalidInput(format!(
            "{} for {} has AQI level {} (max {})",
            kind, location, level, LEVEL_COUNT
        )));
    }
    Ok(())
}

/// Loads forecast records and converts them to `ForecastPoint`s.
///
/// # Errors
///
/// `AppError::Io` / `AppError::JsonParse` for unreadable files, and
/// `AppError::InvalidInput` when an AQI level is out of range.
pub async fn load_forecasts(path: impl AsRef<Path>) -> Result<Vec<ForecastPoint>> {
    let path = path.as_ref();
    info!("Loading forecasts from {}", path.display());
    let records: Vec<ForecastRecord> = read_records(path).await?;
    records
        .into_iter()
        .map(|record| {
            let point = ForecastPoint::from(record);
            check_level("Forecast", &point.location_name, point.overall_aqi_level)?;
            for reading in point.pollutants.values() {
                check_level("Forecast", &point.location_name, reading.aqi_level)?;
            }
            Ok(point)
        })
        .collect()
}

/// Loads averaged measurement records.
pub async fn load_measurement_summaries(path: impl AsRef<Path>) -> Result<Vec<MeasurementSummary>> {
    let path = path.as_ref();
    info!("Loading measurement summaries from {}", path.display());
    let records: Vec<MeasurementSummaryRecord> = read_records(path).await?;
    records
        .into_iter()
        .map(|record| {
            let summary = MeasurementSummary::from(record);
            check_level("Measurement", &summary.location_name, summary.overall_aqi_level)?;
            for reading in summary.pollutants.values() {
                check_level("Measurement", &summary.location_name, reading.aqi_level)?;
            }
            Ok(summary)
        })
        .collect()
}

/// Loads raw measurement samples.
pub async fn load_samples(path: impl AsRef<Path>) -> Result<Vec<MeasurementSample>> {
    let path = path.as_ref();
    info!("Loading raw samples from {}", path.display());
    let records: Vec<MeasurementSampleRecord> = read_records(path).await?;
    Ok(records.into_iter().map(MeasurementSample::from).collect())
}
