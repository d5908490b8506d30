//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.
//!
//! The comparison engine itself never fails; these errors come from loading input,
//! reading configuration and driving the CLI.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Error during JSON parsing (`serde_json`). Wrapped in Arc as serde_json::Error is not Clone.
    #[error("JSON Parsing Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Error related to accessing environment variables.
    #[error("Environment Error: {0}")]
    Env(#[from] std::env::VarError),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Invalid configuration value (breakpoint tables, env flags).
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Input that parsed but violates the engine's preconditions.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Error specific to CLI logic or argument handling.
    #[error("CLI Error: {0}")]
    Cli(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// Arc is used for non-Clone error types.

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::InvalidInput(format!("invalid timestamp: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_wrapped_and_cloneable() {
        let err: AppError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        let cloned = err.clone();
        assert!(matches!(cloned, AppError::JsonParse(_)));
        assert!(err.to_string().starts_with("JSON Parsing Error"));
    }

    #[test]
    fn test_chrono_error_maps_to_invalid_input() {
        let err: AppError = chrono::DateTime::parse_from_rfc3339("yesterday")
            .unwrap_err()
            .into();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.contains("invalid timestamp")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
