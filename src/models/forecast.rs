//! Forecast records as delivered by the upstream data source, and the
//! engine-side `ForecastPoint` they are converted into.

use super::Pollutant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A concentration together with the AQI level the data source assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PollutantReading {
    pub aqi_level: u8,
    pub value: f64,
}

/// One forecast record in the upstream wire shape.
///
/// Pollutant fields are optional so that a partially populated record still
/// deserializes; a missing species is simply skipped downstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastRecord {
    pub base_time: DateTime<Utc>,
    pub valid_time: DateTime<Utc>,
    #[serde(default)]
    pub location_type: Option<String>,
    pub location_name: String,
    pub overall_aqi_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm2_5: Option<PollutantReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<PollutantReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<PollutantReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o3: Option<PollutantReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<PollutantReading>,
}

impl ForecastRecord {
    /// Reading for `pollutant`, if the record carries one.
    pub fn reading(&self, pollutant: Pollutant) -> Option<PollutantReading> {
        match pollutant {
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
        }
    }
}

/// A model-predicted reading for a location at one valid time.
///
/// `overall_aqi_level` is trusted as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub location_name: String,
    pub valid_time: DateTime<Utc>,
    pub pollutants: BTreeMap<Pollutant, PollutantReading>,
    pub overall_aqi_level: u8,
}

impl From<ForecastRecord> for ForecastPoint {
    fn from(record: ForecastRecord) -> Self {
        let pollutants = Pollutant::ALL
            .iter()
            .filter_map(|p| record.reading(*p).map(|r| (*p, r)))
            .collect();
        Self {
            location_name: record.location_name,
            valid_time: record.valid_time,
            pollutants,
            overall_aqi_level: record.overall_aqi_level,
        }
    }
}

/// Groups forecast points by location, preserving input order within each location.
pub fn group_forecasts<I>(points: I) -> BTreeMap<String, Vec<ForecastPoint>>
where
    I: IntoIterator<Item = ForecastPoint>,
{
    let mut grouped: BTreeMap<String, Vec<ForecastPoint>> = BTreeMap::new();
    for point in points {
        grouped
            .entry(point.location_name.clone())
            .or_default()
            .push(point);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_and_converts() {
        let raw = json!({
            "base_time": "2024-03-10T00:00:00Z",
            "valid_time": "2024-03-10T06:00:00Z",
            "location_type": "city",
            "location_name": "Athens",
            "overall_aqi_level": 4,
            "pm2_5": { "aqi_level": 4, "value": 31.2 },
            "o3": { "aqi_level": 2, "value": 77.0 }
        });
        let record: ForecastRecord = serde_json::from_value(raw).unwrap();
        let point = ForecastPoint::from(record);

        assert_eq!(point.location_name, "Athens");
        assert_eq!(point.overall_aqi_level, 4);
        assert_eq!(point.pollutants.len(), 2);
        assert_eq!(point.pollutants[&Pollutant::Pm2_5].aqi_level, 4);
        assert!(!point.pollutants.contains_key(&Pollutant::No2));
    }

    #[test]
    fn test_group_forecasts_keeps_input_order() {
        let make = |name: &str, hour: u32| {
            ForecastPoint {
                location_name: name.to_string(),
                valid_time: chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 1, 1, hour, 0, 0)
                    .unwrap(),
                pollutants: BTreeMap::new(),
                overall_aqi_level: 1,
            }
        };
        let grouped = group_forecasts(vec![make("B", 3), make("A", 1), make("B", 1)]);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        let hours: Vec<u32> = grouped["B"]
            .iter()
            .map(|p| chrono::Timelike::hour(&p.valid_time))
            .collect();
        assert_eq!(hours, vec![3, 1]);
    }
}
