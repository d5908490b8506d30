//! Provides a mock data provider for generating plausible forecasts and raw samples.
//!
//! Used by the `demo` command and in tests where consistent, controllable data
//! is needed without an upstream data source.

use crate::aqi::Classifier;
use crate::models::{ForecastPoint, MeasurementSample, Pollutant, PollutantReading};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

/// Predefined locations with their monitoring sites.
const LOCATIONS: [(&str, &[&str]); 8] = [
    ("Amsterdam", &["Vondelpark", "Nieuwendammerdijk", "Stadhouderskade"]),
    ("Athens", &["Patision", "Marousi", "Lykovrysi"]),
    ("Berlin", &["Mitte", "Neukolln", "Wedding"]),
    ("Karachi", &["Saddar", "Korangi"]),
    ("Lahore", &["Gulberg", "Township"]),
    ("Madrid", &["Castellana", "Retiro", "Vallecas"]),
    ("Paris", &["Les Halles", "Bobigny"]),
    ("Thessaloniki", &["Eptapyrgio", "Kalamaria"]),
];

/// Forecast and raw sample collections for a set of locations.
#[derive(Debug, Clone)]
pub struct MockDataset {
    pub base_time: DateTime<Utc>,
    pub forecasts: Vec<ForecastPoint>,
    pub samples: Vec<MeasurementSample>,
}

/// Generates mock forecast and measurement data.
///
/// Concentrations are drawn from typical per-pollutant ranges scaled by a
/// location pollution factor. Measurements scatter around the forecast with
/// occasional missing species and zero readings.
pub struct MockDataProvider {
    rng: StdRng,
    classifier: Classifier,
}

impl MockDataProvider {
    /// Creates a provider seeded from entropy.
    pub fn new(classifier: Classifier) -> Self {
        debug!("Creating MockDataProvider");
        Self {
            rng: StdRng::from_entropy(),
            classifier,
        }
    }

    /// Creates a provider producing the same data for the same seed.
    pub fn with_seed(seed: u64, classifier: Classifier) -> Self {
        debug!("Creating MockDataProvider with seed {}", seed);
        Self {
            rng: StdRng::seed_from_u64(seed),
            classifier,
        }
    }

    /// Names of locations mock data can be generated for.
    pub fn location_names() -> Vec<&'static str> {
        LOCATIONS.iter().map(|(name, _)| *name).collect()
    }

    /// Generates `hours` hourly forecasts per location starting at `base_time`,
    /// plus two to four raw samples per site and hour.
    ///
    /// `locations` is capped at the number of predefined locations.
    pub fn generate(&mut self, base_time: DateTime<Utc>, locations: usize, hours: u32) -> MockDataset {
        let mut forecasts = Vec::new();
        let mut samples = Vec::new();

        for (name, sites) in LOCATIONS.iter().take(locations) {
            let factor = self.location_factor(name);
            for hour in 0..hours {
                let valid_time = base_time + Duration::hours(hour as i64);
                let predicted = self.concentrations(factor);
                forecasts.push(self.forecast_point(name, valid_time, &predicted));

                for site in sites.iter() {
                    let readings = self.rng.gen_range(2..=4);
                    for _ in 0..readings {
                        // Jitter stays inside the hourly bucket window.
                        let jitter = Duration::minutes(self.rng.gen_range(-30..30));
                        samples.push(self.sample(name, site, valid_time + jitter, &predicted));
                    }
                }
            }
        }

        // Sort by date for consistency with upstream feeds
        samples.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        debug!(
            "Generated {} forecasts and {} samples",
            forecasts.len(),
            samples.len()
        );
        MockDataset {
            base_time,
            forecasts,
            samples,
        }
    }

    fn forecast_point(
        &self,
        location: &str,
        valid_time: DateTime<Utc>,
        concentrations: &BTreeMap<Pollutant, f64>,
    ) -> ForecastPoint {
        let pollutants: BTreeMap<Pollutant, PollutantReading> = concentrations
            .iter()
            .map(|(p, value)| {
                (
                    *p,
                    PollutantReading {
                        aqi_level: self.classifier.classify(Some(*value), *p),
                        value: *value,
                    },
                )
            })
            .collect();
        ForecastPoint {
            location_name: location.to_string(),
            valid_time,
            overall_aqi_level: Classifier::overall(pollutants.values().map(|r| r.aqi_level)),
            pollutants,
        }
    }

    fn sample(
        &mut self,
        location: &str,
        site: &str,
        timestamp: DateTime<Utc>,
        predicted: &BTreeMap<Pollutant, f64>,
    ) -> MeasurementSample {
        let mut pollutants = BTreeMap::new();
        for (pollutant, value) in predicted {
            // Sensors do not report every species
            if self.rng.gen_bool(0.15) {
                continue;
            }
            let measured = if self.rng.gen_bool(0.05) {
                0.0
            } else {
                (value * self.rng.gen_range(0.4..1.8)).max(0.1)
            };
            pollutants.insert(*pollutant, measured);
        }
        MeasurementSample {
            site_name: site.to_string(),
            location_name: location.to_string(),
            timestamp,
            pollutants,
        }
    }

    /// One concentration per pollutant from typical ranges (µg/m³).
    fn concentrations(&mut self, factor: f64) -> BTreeMap<Pollutant, f64> {
        Pollutant::ALL
            .iter()
            .map(|pollutant| {
                let (min, max) = match pollutant {
                    Pollutant::Pm2_5 => (5.0, 35.0),
                    Pollutant::Pm10 => (10.0, 50.0),
                    Pollutant::No2 => (10.0, 60.0),
                    Pollutant::O3 => (30.0, 100.0),
                    Pollutant::So2 => (2.0, 20.0),
                };
                (*pollutant, self.rng.gen_range(min * factor..max * factor))
            })
            .collect()
    }

    fn location_factor(&self, location: &str) -> f64 {
        match location {
            "Amsterdam" | "Berlin" | "Paris" | "Madrid" => 0.9,
            "Athens" | "Thessaloniki" => 1.1,
            "Karachi" | "Lahore" => 1.8,
            _ => 1.0,
        }
    }
}
