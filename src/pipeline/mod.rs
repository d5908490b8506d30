//! The forecast-vs-measurement comparison pipeline.
//!
//! - `bucket`: hourly bucketing and averaging of raw samples.
//! - `compare`: per-location reduction to the most significant deviations.
//! - `diff`: ordering over signed-magnitude difference strings.

mod bucket;
mod compare;
mod diff;
#[cfg(test)]
mod pipeline_test;

pub use bucket::*;
pub use compare::*;
pub use diff::*;
