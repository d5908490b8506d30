//! Defines the data structures and models used throughout the application.
//!
//! This includes the upstream wire records (forecasts, raw samples, averaged
//! summaries), the domain types they convert into, and the comparison outputs.

mod comparison;
mod forecast;
mod measurement;
mod pollutant;

pub use comparison::*;
pub use forecast::*;
pub use measurement::*;
pub use pollutant::*;
