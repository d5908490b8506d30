//! Resamples irregular multi-site measurement samples into hourly buckets
//! anchored to a forecast base time, then averages each bucket.

use crate::aqi::{Classifier, NO_DATA};
use crate::models::{MeasurementSample, MeasurementSummary, Pollutant, PollutantReading};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Buckets cover offsets `0..=120` hours from the base time.
pub const BUCKET_COUNT: u32 = 121;

/// Distance between consecutive bucket centres.
pub fn bucket_step() -> Duration {
    Duration::hours(1)
}

/// Half the width of a bucket window.
pub fn bucket_half_width() -> Duration {
    Duration::minutes(30)
}

/// A one-hour window `[center - 30min, center + 30min)` and the samples inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub center_time: DateTime<Utc>,
    pub lower_bound: DateTime<Utc>,
    pub upper_bound: DateTime<Utc>,
    pub samples: Vec<MeasurementSample>,
}

impl TimeBucket {
    fn new(center_time: DateTime<Utc>) -> Self {
        Self {
            center_time,
            lower_bound: center_time - bucket_half_width(),
            upper_bound: center_time + bucket_half_width(),
            samples: Vec::new(),
        }
    }

    /// Lower bound inclusive, upper bound exclusive.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.lower_bound <= timestamp && timestamp < self.upper_bound
    }
}

/// Mean concentration of one pollutant within a bucket.
pub type MeanReading = PollutantReading;

/// Averages for one non-empty bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketAverage {
    pub timestamp: DateTime<Utc>,
    pub mean_aqi_level: u8,
    /// Only pollutants with at least one non-zero reading.
    pub pollutants: BTreeMap<Pollutant, MeanReading>,
}

impl BucketAverage {
    /// Re-shapes the average as a measurement summary for `location_name`.
    pub fn into_summary(self, location_name: &str) -> MeasurementSummary {
        MeasurementSummary {
            location_name: location_name.to_string(),
            timestamp: self.timestamp,
            overall_aqi_level: self.mean_aqi_level,
            pollutants: self.pollutants,
        }
    }
}

/// Assigns each sample to the first bucket whose window contains it.
///
/// Samples outside every window are dropped. Empty buckets are pruned, so the
/// returned map only holds offsets (in hours) that received samples.
pub fn bucket(samples: &[MeasurementSample], base_time: DateTime<Utc>) -> BTreeMap<u32, TimeBucket> {
    let mut buckets: BTreeMap<u32, TimeBucket> = (0..BUCKET_COUNT)
        .map(|offset| {
            let center = base_time + bucket_step() * offset as i32;
            (offset, TimeBucket::new(center))
        })
        .collect();

    let mut unassigned = 0usize;
    for sample in samples {
        match buckets
            .values_mut()
            .find(|bucket| bucket.contains(sample.timestamp))
        {
            Some(bucket) => bucket.samples.push(sample.clone()),
            None => unassigned += 1,
        }
    }

    buckets.retain(|_, bucket| !bucket.samples.is_empty());
    debug!(
        "Bucketed {} samples into {} buckets ({} outside the window)",
        samples.len(),
        buckets.len(),
        unassigned
    );
    buckets
}

/// Averages every bucket, in ascending offset order.
///
/// Per pollutant, only samples reporting a non-zero value count towards the
/// mean. The bucket's `mean_aqi_level` is the highest level among the
/// per-pollutant means, or `0` when no pollutant had a usable reading.
pub fn average(buckets: &BTreeMap<u32, TimeBucket>, classifier: &Classifier) -> Vec<BucketAverage> {
    buckets
        .values()
        .map(|bucket| average_bucket(bucket, classifier))
        .collect()
}

fn average_bucket(bucket: &TimeBucket, classifier: &Classifier) -> BucketAverage {
    let pollutants: BTreeMap<Pollutant, MeanReading> = Pollutant::ALL
        .iter()
        .filter_map(|pollutant| {
            let (sum, count) = bucket
                .samples
                .iter()
                .filter_map(|s| s.pollutants.get(pollutant).copied())
                .filter(|value| *value != 0.0)
                .fold((0.0, 0u32), |(sum, count), value| (sum + value, count + 1));
            if count == 0 {
                return None;
            }
            let mean = sum / count as f64;
            Some((
                *pollutant,
                MeanReading {
                    aqi_level: classifier.classify(Some(mean), *pollutant),
                    value: mean,
                },
            ))
        })
        .collect();

    let mean_aqi_level = Classifier::overall(
        std::iter::once(NO_DATA).chain(pollutants.values().map(|r| r.aqi_level)),
    );

    BucketAverage {
        timestamp: bucket.center_time,
        mean_aqi_level,
        pollutants,
    }
}

/// Buckets and averages raw samples per location.
///
/// Returns chronological measurement summaries keyed by location name.
pub fn summarise_samples(
    samples: &[MeasurementSample],
    base_time: DateTime<Utc>,
    classifier: &Classifier,
) -> BTreeMap<String, Vec<MeasurementSummary>> {
    let mut by_location: BTreeMap<&str, Vec<MeasurementSample>> = BTreeMap::new();
    for sample in samples {
        by_location
            .entry(sample.location_name.as_str())
            .or_default()
            .push(sample.clone());
    }

    by_location
        .into_iter()
        .map(|(location, location_samples)| {
            let buckets = bucket(&location_samples, base_time);
            let summaries = average(&buckets, classifier)
                .into_iter()
                .map(|avg| avg.into_summary(location))
                .collect();
            (location.to_string(), summaries)
        })
        .collect()
}
