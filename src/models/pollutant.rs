//! The closed set of pollutant species handled by the engine.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monitored pollutant species.
///
/// Variant order is the canonical order (fine particulate, coarse particulate,
/// nitrogen dioxide, ozone, sulphur dioxide). `Ord` follows it, so a
/// `BTreeMap<Pollutant, _>` always iterates canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "pm2_5")]
    Pm2_5,
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "no2")]
    No2,
    #[serde(rename = "o3")]
    O3,
    #[serde(rename = "so2")]
    So2,
}

impl Pollutant {
    /// Every pollutant, in canonical order.
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::So2,
    ];

    /// Wire key used in forecast and measurement records.
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::So2 => "so2",
        }
    }

    /// Human-readable name for table headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::O3 => "O3",
            Pollutant::So2 => "SO2",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Pollutant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['.', '-'], "_");
        match normalized.as_str() {
            "pm2_5" | "pm25" => Ok(Pollutant::Pm2_5),
            "pm10" => Ok(Pollutant::Pm10),
            "no2" => Ok(Pollutant::No2),
            "o3" => Ok(Pollutant::O3),
            "so2" => Ok(Pollutant::So2),
            _ => Err(AppError::InvalidInput(format!(
                "Unknown pollutant '{}'. Must be one of: {:?}",
                s,
                Pollutant::ALL.map(|p| p.key())
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[test]
    fn test_canonical_order_drives_map_iteration() {
        let map: BTreeMap<Pollutant, u8> = [
            (Pollutant::So2, 5),
            (Pollutant::O3, 4),
            (Pollutant::Pm2_5, 1),
            (Pollutant::No2, 3),
            (Pollutant::Pm10, 2),
        ]
        .into_iter()
        .collect();
        let keys: Vec<Pollutant> = map.keys().copied().collect();
        assert_eq!(keys, Pollutant::ALL.to_vec());
    }

    #[rstest]
    #[case("pm2_5", Pollutant::Pm2_5)]
    #[case("PM2.5", Pollutant::Pm2_5)]
    #[case("pm25", Pollutant::Pm2_5)]
    #[case("pm10", Pollutant::Pm10)]
    #[case("NO2", Pollutant::No2)]
    #[case("o3", Pollutant::O3)]
    #[case(" so2 ", Pollutant::So2)]
    fn test_from_str_accepts_known_keys(#[case] input: &str, #[case] expected: Pollutant) {
        assert_eq!(input.parse::<Pollutant>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "co".parse::<Pollutant>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_serde_uses_wire_keys() {
        assert_eq!(serde_json::to_string(&Pollutant::Pm2_5).unwrap(), "\"pm2_5\"");
        let p: Pollutant = serde_json::from_str("\"o3\"").unwrap();
        assert_eq!(p, Pollutant::O3);
    }
}
