//! Ground-truth measurement data: raw site samples and per-location hourly summaries.

use super::{Pollutant, PollutantReading};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Raw samples ---

/// One raw sensor reading in the upstream wire shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeasurementSampleRecord {
    pub measurement_date: DateTime<Utc>,
    pub location_name: String,
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm2_5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
}

impl MeasurementSampleRecord {
    fn concentration(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
        }
    }
}

/// A raw reading from one monitoring site.
///
/// Species the sensor does not report are absent from `pollutants`. A reported
/// value of `0` is kept here and excluded later when averaging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSample {
    pub site_name: String,
    pub location_name: String,
    pub timestamp: DateTime<Utc>,
    pub pollutants: BTreeMap<Pollutant, f64>,
}

impl From<MeasurementSampleRecord> for MeasurementSample {
    fn from(record: MeasurementSampleRecord) -> Self {
        let pollutants = Pollutant::ALL
            .iter()
            .filter_map(|p| record.concentration(*p).map(|v| (*p, v)))
            .collect();
        Self {
            site_name: record.site_name,
            location_name: record.location_name,
            timestamp: record.measurement_date,
            pollutants,
        }
    }
}

// --- Hourly summaries ---

/// `{ "mean": ... }` wrapper used by the summary wire format.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Mean<T> {
    pub mean: T,
}

/// One averaged measurement record in the upstream wire shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeasurementSummaryRecord {
    pub measurement_base_time: DateTime<Utc>,
    #[serde(default)]
    pub location_type: Option<String>,
    pub location_name: String,
    pub overall_aqi_level: Mean<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm2_5: Option<Mean<PollutantReading>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<Mean<PollutantReading>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<Mean<PollutantReading>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o3: Option<Mean<PollutantReading>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<Mean<PollutantReading>>,
}

impl MeasurementSummaryRecord {
    fn reading(&self, pollutant: Pollutant) -> Option<PollutantReading> {
        let field = match pollutant {
            Pollutant::Pm2_5 => &self.pm2_5,
            Pollutant::Pm10 => &self.pm10,
            Pollutant::No2 => &self.no2,
            Pollutant::O3 => &self.o3,
            Pollutant::So2 => &self.so2,
        };
        field.map(|m| m.mean)
    }
}

/// Averaged measurements for a location at one hourly timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSummary {
    pub location_name: String,
    pub timestamp: DateTime<Utc>,
    pub overall_aqi_level: u8,
    pub pollutants: BTreeMap<Pollutant, PollutantReading>,
}

impl From<MeasurementSummaryRecord> for MeasurementSummary {
    fn from(record: MeasurementSummaryRecord) -> Self {
        let pollutants = Pollutant::ALL
            .iter()
            .filter_map(|p| record.reading(*p).map(|r| (*p, r)))
            .collect();
        Self {
            location_name: record.location_name,
            timestamp: record.measurement_base_time,
            overall_aqi_level: record.overall_aqi_level.mean,
            pollutants,
        }
    }
}

/// Groups measurement summaries by location, preserving input order within each location.
pub fn group_summaries<I>(summaries: I) -> BTreeMap<String, Vec<MeasurementSummary>>
where
    I: IntoIterator<Item = MeasurementSummary>,
{
    let mut grouped: BTreeMap<String, Vec<MeasurementSummary>> = BTreeMap::new();
    for summary in summaries {
        grouped
            .entry(summary.location_name.clone())
            .or_default()
            .push(summary);
    }
    grouped
}
