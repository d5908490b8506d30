//! Environment-driven configuration.
//!
//! Values are read once at start-up (after `.env` is loaded by `dotenv`) and
//! passed down explicitly; nothing here is global.

use crate::aqi::{BreakpointTable, Classifier};
use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

pub const BREAKPOINTS_FILE_VAR: &str = "AQ_BREAKPOINTS_FILE";
pub const LOG_DIR_VAR: &str = "AQ_LOG_DIR";
pub const DESCENDING_VAR: &str = "AQ_DESCENDING";

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON breakpoint table overriding the defaults.
    pub breakpoints_file: Option<PathBuf>,
    /// Directory for rolling log files; console only when unset.
    pub log_dir: Option<PathBuf>,
    /// Rank the most divergent locations first.
    pub descending: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breakpoints_file: None,
            log_dir: None,
            descending: true,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Env` for non-unicode values and `AppError::Config`
    /// when `AQ_DESCENDING` is not a boolean.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            breakpoints_file: optional_var(BREAKPOINTS_FILE_VAR)?.map(PathBuf::from),
            log_dir: optional_var(LOG_DIR_VAR)?.map(PathBuf::from),
            descending: match optional_var(DESCENDING_VAR)? {
                Some(raw) => parse_bool(DESCENDING_VAR, &raw)?,
                None => true,
            },
        };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Builds the classifier, loading the breakpoint override if configured.
    pub fn classifier(&self) -> Result<Classifier> {
        match &self.breakpoints_file {
            Some(path) => Ok(Classifier::new(BreakpointTable::from_file(path)?)),
            None => {
                info!("Using default breakpoint table");
                Ok(Classifier::default())
            },
        }
    }
}

/// `Ok(None)` when the variable is unset or blank.
fn optional_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AppError::Env(e)),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, raw
        ))),
    }
}
