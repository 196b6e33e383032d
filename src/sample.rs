use crate::coord::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// One captured geographic position.
///
/// Latitude and longitude are not range-checked; out-of-range values are
/// bucketed and projected like any others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            captured_at,
        }
    }

    /// A sample captured now.
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, Utc::now())
    }
}

impl Coordinate for LocationSample {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

// Shared by every set in the process, so a version names one set's contents.
static GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// An ordered collection of samples with a version stamp.
///
/// Every construction and every insertion takes a fresh, process-wide unique
/// version, so `(version, viewport)` is enough to tell whether a previously
/// composed heatmap is still current, even across different sets. A clone
/// keeps its source's version until either of them changes.
#[derive(Debug, Clone)]
pub struct SampleSet {
    samples: Vec<LocationSample>,
    version: u64,
}

impl Default for SampleSet {
    fn default() -> Self {
        Self::from_samples(Vec::new())
    }
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<LocationSample>) -> Self {
        Self {
            samples,
            version: next_generation(),
        }
    }

    pub fn push(&mut self, sample: LocationSample) {
        self.samples.push(sample);
        self.version = next_generation();
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn samples(&self) -> &[LocationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationSample> {
        self.samples.iter()
    }
}

impl Extend<LocationSample> for SampleSet {
    fn extend<I: IntoIterator<Item = LocationSample>>(&mut self, iter: I) {
        let before = self.samples.len();
        self.samples.extend(iter);
        if self.samples.len() != before {
            self.version = next_generation();
        }
    }
}

impl FromIterator<LocationSample> for SampleSet {
    fn from_iter<I: IntoIterator<Item = LocationSample>>(iter: I) -> Self {
        Self::from_samples(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_bumps_version() {
        let mut set = SampleSet::new();
        let initial = set.version();

        set.push(LocationSample::now(40.0, -73.0));
        let after_one = set.version();
        set.push(LocationSample::now(40.1, -73.1));

        assert!(after_one > initial);
        assert!(set.version() > after_one);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_extend_bumps_version_once() {
        let mut set = SampleSet::new();
        let initial = set.version();

        set.extend(vec![
            LocationSample::now(1.0, 1.0),
            LocationSample::now(2.0, 2.0),
        ]);
        let extended = set.version();
        assert_ne!(extended, initial);

        set.extend(Vec::new());
        assert_eq!(set.version(), extended);
    }

    #[test]
    fn test_separate_sets_never_share_a_version() {
        let a = SampleSet::new();
        let b = SampleSet::new();
        let c: SampleSet = vec![LocationSample::now(1.0, 1.0)].into_iter().collect();
        let d = SampleSet::from_samples(vec![LocationSample::now(1.0, 1.0)]);

        let versions = [a.version(), b.version(), c.version(), d.version()];
        for (i, v) in versions.iter().enumerate() {
            assert!(!versions[i + 1..].contains(v));
        }
    }

    #[test]
    fn test_clone_diverges_on_push() {
        let mut original = SampleSet::from_samples(vec![LocationSample::now(1.0, 1.0)]);
        let mut copy = original.clone();
        assert_eq!(copy.version(), original.version());

        original.push(LocationSample::now(2.0, 2.0));
        copy.push(LocationSample::now(3.0, 3.0));
        assert_ne!(copy.version(), original.version());
    }

    #[test]
    fn test_sample_is_a_coordinate() {
        let sample = LocationSample::now(40.0, -73.0);
        assert_eq!(sample.latitude(), 40.0);
        assert_eq!(Coordinate::longitude(&sample), -73.0);
    }
}
