//! Reduces each location's forecast and measurement series to the most
//! significant deviation per pollutant, then to one summary row.
//!
//! Selection everywhere follows `Deviation::supersedes`: a strictly larger
//! difference wins, and an equal difference only wins when it comes with a
//! strictly higher forecast AQI level. Earlier candidates therefore survive
//! ties that do not raise the forecast severity.

use crate::models::{
    ForecastCell, ForecastData, ForecastPoint, ForecastSummary, LocationComparison,
    MeasurementCell, MeasurementData, MeasurementSummary, MeasurementsSummary, Pollutant,
    PollutantComparison, SummaryRow,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Decimal places kept on every reported concentration.
pub const VALUE_PRECISION: i32 = 1;

/// A forecast/measurement AQI level pair and the size of their gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deviation {
    pub difference: u8,
    pub forecast_aqi: u8,
    pub measurement_aqi: u8,
}

impl Deviation {
    pub fn between(forecast_aqi: u8, measurement_aqi: u8) -> Self {
        Self {
            difference: forecast_aqi.abs_diff(measurement_aqi),
            forecast_aqi,
            measurement_aqi,
        }
    }

    /// Whether this candidate replaces `current` as the retained deviation.
    pub fn supersedes(&self, current: Option<&Deviation>) -> bool {
        match current {
            None => true,
            Some(current) => {
                self.difference > current.difference
                    || (self.difference == current.difference
                        && self.forecast_aqi > current.forecast_aqi)
            },
        }
    }

    /// Signed-magnitude rendering, e.g. `"+3"`, `"-1"` or `"0"`.
    pub fn signed(&self) -> String {
        format_signed_diff(self.forecast_aqi, self.measurement_aqi)
    }
}

/// `+` when the forecast is worse than measured, `-` when better, nothing when equal.
pub fn format_signed_diff(forecast_aqi: u8, measurement_aqi: u8) -> String {
    let sign = match forecast_aqi.cmp(&measurement_aqi) {
        std::cmp::Ordering::Greater => "+",
        std::cmp::Ordering::Less => "-",
        std::cmp::Ordering::Equal => "",
    };
    format!("{}{}", sign, forecast_aqi.abs_diff(measurement_aqi))
}

/// Rounds a concentration to `VALUE_PRECISION` decimal places.
pub fn round_value(value: f64) -> f64 {
    let factor = 10f64.powi(VALUE_PRECISION);
    (value * factor).round() / factor
}

impl PollutantComparison {
    /// The recorded deviation, if a measurement has been matched.
    pub fn deviation(&self) -> Option<Deviation> {
        let measurement = self.measurement_data?;
        let difference = self.aqi_difference?;
        Some(Deviation {
            difference,
            forecast_aqi: self.forecast_data.aqi_level,
            measurement_aqi: measurement.aqi_level,
        })
    }
}

/// Compares every forecast location against its measurement series.
///
/// Locations are processed independently (in parallel); output follows the
/// order of `forecasts`. Measurement series for locations without forecasts
/// are ignored. A location without measurements yields a forecast-only result.
pub fn compare(
    forecasts: &BTreeMap<String, Vec<ForecastPoint>>,
    measurements: &BTreeMap<String, Vec<MeasurementSummary>>,
) -> Vec<LocationComparison> {
    let unmatched = measurements
        .keys()
        .filter(|name| !forecasts.contains_key(*name))
        .count();
    if unmatched > 0 {
        debug!("{} measured locations have no forecast and are ignored", unmatched);
    }

    let locations: Vec<(&String, &Vec<ForecastPoint>)> = forecasts.iter().collect();
    locations
        .par_iter()
        .filter_map(|(location, points)| {
            compare_location(location, points, measurements.get(*location).map(Vec::as_slice))
        })
        .collect()
}

/// Compares one location. `None` when the location has no forecast points.
pub fn compare_location(
    location: &str,
    forecasts: &[ForecastPoint],
    measurements: Option<&[MeasurementSummary]>,
) -> Option<LocationComparison> {
    let Some(latest) = latest_forecast(forecasts) else {
        warn!("Location {} has no forecast points; skipping", location);
        return None;
    };
    let LocationComparison {
        location_name,
        forecast_overall_aqi,
        per_pollutant,
    } = default_comparison(location, latest);

    let Some(series) = measurements else {
        debug!("No measurements for {}; forecast-only result", location);
        return Some(LocationComparison {
            location_name,
            forecast_overall_aqi,
            per_pollutant,
        });
    };

    let by_valid_time: HashMap<DateTime<Utc>, &ForecastPoint> =
        forecasts.iter().map(|p| (p.valid_time, p)).collect();

    let per_pollutant = series
        .iter()
        .filter_map(|m| by_valid_time.get(&m.timestamp).map(|f| (*f, m)))
        .fold(per_pollutant, |acc, (forecast, measurement)| {
            refine(acc, forecast, measurement)
        });

    debug!(
        "Compared {} ({} measurement points, {} pollutants)",
        location,
        series.len(),
        per_pollutant.len()
    );
    Some(LocationComparison {
        location_name,
        forecast_overall_aqi,
        per_pollutant,
    })
}

/// The point with the greatest valid time; the first one wins on equal times.
fn latest_forecast(forecasts: &[ForecastPoint]) -> Option<&ForecastPoint> {
    forecasts.iter().reduce(|latest, point| {
        if point.valid_time > latest.valid_time {
            point
        } else {
            latest
        }
    })
}

fn default_comparison(location: &str, latest: &ForecastPoint) -> LocationComparison {
    let per_pollutant = latest
        .pollutants
        .iter()
        .map(|(pollutant, reading)| {
            (
                *pollutant,
                PollutantComparison {
                    aqi_difference: None,
                    forecast_data: ForecastData {
                        aqi_level: reading.aqi_level,
                        value: reading.value,
                        valid_time: latest.valid_time,
                    },
                    measurement_data: None,
                },
            )
        })
        .collect();

    LocationComparison {
        location_name: location.to_string(),
        forecast_overall_aqi: latest.overall_aqi_level,
        per_pollutant,
    }
}

/// Folds one time-aligned forecast/measurement pair into the running comparisons.
fn refine(
    mut comparisons: BTreeMap<Pollutant, PollutantComparison>,
    forecast: &ForecastPoint,
    measurement: &MeasurementSummary,
) -> BTreeMap<Pollutant, PollutantComparison> {
    for (pollutant, predicted) in &forecast.pollutants {
        let Some(measured) = measurement.pollutants.get(pollutant) else {
            continue;
        };
        let candidate = Deviation::between(predicted.aqi_level, measured.aqi_level);
        let current = comparisons
            .get(pollutant)
            .and_then(PollutantComparison::deviation);
        if candidate.supersedes(current.as_ref()) {
            comparisons.insert(
                *pollutant,
                PollutantComparison {
                    aqi_difference: Some(candidate.difference),
                    forecast_data: ForecastData {
                        aqi_level: predicted.aqi_level,
                        value: predicted.value,
                        valid_time: forecast.valid_time,
                    },
                    measurement_data: Some(MeasurementData {
                        aqi_level: measured.aqi_level,
                        value: measured.value,
                    }),
                },
            );
        }
    }
    comparisons
}

/// Picks the overall deviation across pollutants, in canonical order.
pub fn overall_deviation(comparison: &LocationComparison) -> Option<Deviation> {
    comparison
        .per_pollutant
        .values()
        .filter_map(PollutantComparison::deviation)
        .fold(None, |best, candidate| {
            if candidate.supersedes(best.as_ref()) {
                Some(candidate)
            } else {
                best
            }
        })
}

/// Reduces a location comparison to a presentation-ready row.
pub fn reduce(comparison: &LocationComparison) -> SummaryRow {
    let selected = overall_deviation(comparison);

    let forecast_cells = comparison
        .per_pollutant
        .iter()
        .map(|(pollutant, c)| {
            (
                *pollutant,
                ForecastCell {
                    value: round_value(c.forecast_data.value),
                    time: c.forecast_data.valid_time,
                    aqi_level: c.forecast_data.aqi_level,
                },
            )
        })
        .collect();

    let measurements = selected.map(|deviation| MeasurementsSummary {
        aqi_level: deviation.measurement_aqi,
        per_pollutant: comparison
            .per_pollutant
            .iter()
            .filter_map(|(pollutant, c)| {
                c.measurement_data.map(|m| {
                    (
                        *pollutant,
                        MeasurementCell {
                            value: round_value(m.value),
                            aqi_level: m.aqi_level,
                        },
                    )
                })
            })
            .collect(),
    });

    SummaryRow {
        location_name: comparison.location_name.clone(),
        forecast: ForecastSummary {
            aqi_level: selected.map_or(comparison.forecast_overall_aqi, |d| d.forecast_aqi),
            per_pollutant: forecast_cells,
        },
        measurements,
        aqi_difference: selected.map(|d| d.signed()),
    }
}

/// `compare` followed by `reduce` for every location.
pub fn summarise(
    forecasts: &BTreeMap<String, Vec<ForecastPoint>>,
    measurements: &BTreeMap<String, Vec<MeasurementSummary>>,
) -> Vec<SummaryRow> {
    compare(forecasts, measurements).iter().map(reduce).collect()
}
