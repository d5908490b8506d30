//! Output structures of the comparison engine.
//!
//! - `PollutantComparison` / `LocationComparison`: the most significant
//!   forecast-vs-measurement deviation per pollutant for one location.
//! - `SummaryRow`: the presentation-ready reduction of a `LocationComparison`.

use super::Pollutant;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// The forecast side of a pollutant comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastData {
    pub aqi_level: u8,
    pub value: f64,
    pub valid_time: DateTime<Utc>,
}

/// The measurement side of a pollutant comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementData {
    pub aqi_level: u8,
    pub value: f64,
}

/// Running best deviation for one pollutant at one location.
///
/// Starts as the latest forecast with no measurement and no difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantComparison {
    pub aqi_difference: Option<u8>,
    pub forecast_data: ForecastData,
    pub measurement_data: Option<MeasurementData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationComparison {
    pub location_name: String,
    /// Overall AQI level of the latest forecast point.
    pub forecast_overall_aqi: u8,
    pub per_pollutant: BTreeMap<Pollutant, PollutantComparison>,
}

/// Forecast values for one pollutant in a summary row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastCell {
    pub value: f64,
    pub time: DateTime<Utc>,
    pub aqi_level: u8,
}

/// Measured values for one pollutant in a summary row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementCell {
    pub value: f64,
    pub aqi_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub aqi_level: u8,
    pub per_pollutant: BTreeMap<Pollutant, ForecastCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementsSummary {
    pub aqi_level: u8,
    pub per_pollutant: BTreeMap<Pollutant, MeasurementCell>,
}

/// One row of the forecast-vs-measurement table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub location_name: String,
    pub forecast: ForecastSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurements: Option<MeasurementsSummary>,
    /// Signed-magnitude difference (`"+3"`, `"-1"`, `"0"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aqi_difference: Option<String>,
}
