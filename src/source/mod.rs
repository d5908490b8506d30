//! Provides the input side of the application.
//!
//! Includes:
//! - `files`: JSON loaders for forecasts, measurement summaries and raw samples.
//! - `mock`: a seeded generator of plausible synthetic data.

mod files;
mod mock;

pub use files::*;
pub use mock::*;
