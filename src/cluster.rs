use crate::coord::Coordinate;
use crate::index::GridKey;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// All samples that fell into one grid cell.
///
/// `latitude`/`longitude` are the cell's representative coordinate
/// (`index * resolution`), not the centroid of the samples in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityCluster {
    pub key: GridKey,
    pub latitude: f64,
    pub longitude: f64,
    pub count: u32,
}

impl DensityCluster {
    fn from_key(key: GridKey, count: u32, resolution: f64) -> Self {
        Self {
            key,
            latitude: key.latitude(resolution),
            longitude: key.longitude(resolution),
            count,
        }
    }
}

impl Coordinate for DensityCluster {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Buckets samples into grid cells of `resolution` degrees and counts each cell.
///
/// Every sample lands in exactly one cluster, so the counts sum to
/// `samples.len()`. Input order does not matter; the output is sorted by key.
///
/// # Example
/// ```
/// use geoheat::aggregate;
///
/// let samples = [(40.001, -73.001), (40.002, -73.002), (40.100, -73.100)];
/// let clusters = aggregate(&samples, 0.01);
///
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters.iter().map(|c| c.count).sum::<u32>(), 3);
/// ```
pub fn aggregate<C: Coordinate>(samples: &[C], resolution: f64) -> Vec<DensityCluster> {
    let mut counts: HashMap<GridKey, u32> = HashMap::with_capacity(samples.len());

    for sample in samples {
        *counts
            .entry(GridKey::from_coordinate(sample, resolution))
            .or_insert(0) += 1;
    }

    let clusters = into_clusters(counts, resolution);
    debug!(
        samples = samples.len(),
        clusters = clusters.len(),
        resolution,
        "aggregated samples into grid cells"
    );
    clusters
}

/// Same result as [`aggregate`], counting cells on the rayon thread pool.
pub fn aggregate_par<C: Coordinate + Sync>(samples: &[C], resolution: f64) -> Vec<DensityCluster> {
    let counts = samples
        .par_iter()
        .fold(HashMap::new, |mut counts: HashMap<GridKey, u32>, sample| {
            *counts
                .entry(GridKey::from_coordinate(sample, resolution))
                .or_insert(0) += 1;
            counts
        })
        .reduce(HashMap::new, |mut merged, partial| {
            for (key, count) in partial {
                *merged.entry(key).or_insert(0) += count;
            }
            merged
        });

    let clusters = into_clusters(counts, resolution);
    debug!(
        samples = samples.len(),
        clusters = clusters.len(),
        resolution,
        "aggregated samples into grid cells in parallel"
    );
    clusters
}

fn into_clusters(counts: HashMap<GridKey, u32>, resolution: f64) -> Vec<DensityCluster> {
    let mut clusters: Vec<DensityCluster> = counts
        .into_iter()
        .map(|(key, count)| DensityCluster::from_key(key, count, resolution))
        .collect();
    clusters.sort_unstable_by_key(|c| c.key);
    clusters
}
