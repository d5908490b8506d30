//! Forecast-vs-measurement air quality comparison engine.
//!
//! Classifies pollutant concentrations into AQI levels, resamples irregular
//! sensor measurements into hourly buckets, and reduces each location's
//! forecast and measurement series to its most significant deviation.

pub mod aqi;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod source;
