//! Classifies pollutant concentrations into discrete AQI levels.
//!
//! Each pollutant has an ascending table of six breakpoints. A concentration
//! maps to `1 + index` of the first breakpoint it does not exceed, or `6` when
//! it exceeds all of them. A missing concentration maps to `0` ("no data").
//!
//! The breakpoint table is a plain value handed to `Classifier::new`; it is
//! loaded once (defaults or a JSON override) and never mutated afterwards.

use crate::error::{AppError, Result};
use crate::models::Pollutant;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Number of breakpoints per pollutant, which is also the highest AQI level.
pub const LEVEL_COUNT: usize = 6;

/// AQI level meaning "no data".
pub const NO_DATA: u8 = 0;

/// Per-pollutant breakpoint thresholds (µg/m³).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointTable {
    pub pm2_5: [f64; LEVEL_COUNT],
    pub pm10: [f64; LEVEL_COUNT],
    pub no2: [f64; LEVEL_COUNT],
    pub o3: [f64; LEVEL_COUNT],
    pub so2: [f64; LEVEL_COUNT],
}

impl Default for BreakpointTable {
    /// European AQI bands.
    fn default() -> Self {
        Self {
            pm2_5: [10.0, 20.0, 25.0, 50.0, 75.0, 800.0],
            pm10: [20.0, 40.0, 50.0, 100.0, 150.0, 1200.0],
            no2: [40.0, 90.0, 120.0, 230.0, 340.0, 1000.0],
            o3: [50.0, 100.0, 130.0, 240.0, 380.0, 800.0],
            so2: [100.0, 200.0, 350.0, 500.0, 750.0, 1250.0],
        }
    }
}

impl BreakpointTable {
    /// Thresholds for `pollutant`.
    pub fn thresholds(&self, pollutant: Pollutant) -> &[f64; LEVEL_COUNT] {
        match pollutant {
            Pollutant::Pm2_5 => &self.pm2_5,
            Pollutant::Pm10 => &self.pm10,
            Pollutant::No2 => &self.no2,
            Pollutant::O3 => &self.o3,
            Pollutant::So2 => &self.so2,
        }
    }

    /// Checks that every pollutant's thresholds are finite and strictly ascending.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first offending pollutant.
    pub fn validate(&self) -> Result<()> {
        for pollutant in Pollutant::ALL {
            let thresholds = self.thresholds(pollutant);
            if thresholds.iter().any(|t| !t.is_finite()) {
                return Err(AppError::Config(format!(
                    "Breakpoints for {} contain a non-finite value: {:?}",
                    pollutant, thresholds
                )));
            }
            if thresholds.windows(2).any(|w| w[0] >= w[1]) {
                return Err(AppError::Config(format!(
                    "Breakpoints for {} must be strictly ascending: {:?}",
                    pollutant, thresholds
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a table from JSON keyed by pollutant name.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: BreakpointTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Reads a JSON table from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read, `AppError::JsonParse`
    /// if it is not a table, or `AppError::Config` if validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading breakpoint table from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Maps concentrations to AQI levels using an injected `BreakpointTable`.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    table: BreakpointTable,
}

impl Classifier {
    pub fn new(table: BreakpointTable) -> Self {
        debug!("Creating Classifier with table {:?}", table);
        Self { table }
    }

    /// AQI level for `concentration` of `pollutant`; `NO_DATA` when absent.
    pub fn classify(&self, concentration: Option<f64>, pollutant: Pollutant) -> u8 {
        let Some(value) = concentration else {
            return NO_DATA;
        };
        let thresholds = self.table.thresholds(pollutant);
        thresholds
            .iter()
            .position(|threshold| value <= *threshold)
            .map_or(LEVEL_COUNT as u8, |index| index as u8 + 1)
    }

    /// Overall level: the maximum of `levels`, never below `NO_DATA`.
    pub fn overall<I>(levels: I) -> u8
    where
        I: IntoIterator<Item = u8>,
    {
        levels.into_iter().fold(NO_DATA, u8::max)
    }
}

/// Human band name for an AQI level.
pub fn level_label(level: u8) -> &'static str {
    match level {
        1 => "Very good",
        2 => "Good",
        3 => "Medium",
        4 => "Poor",
        5 => "Very poor",
        6 => "Extremely poor",
        _ => "No data",
    }
}
