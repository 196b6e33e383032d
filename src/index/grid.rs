use crate::coord::Coordinate;
use crate::error::HeatmapError;
use crate::index::identifier::{decode_cell_identifier, generate_cell_identifier};
use serde::{Deserialize, Serialize};

/// Quantizes a single coordinate value to its integer bucket index.
///
/// `round(value / resolution)` with ties going to the even index, so
/// `0.5 -> 0`, `1.5 -> 2`, `-2.5 -> -2`.
pub fn bucket_index(value: f64, resolution: f64) -> i64 {
    (value / resolution).round_ties_even() as i64
}

/// The grid cell a sample falls in.
///
/// Stored as integer bucket indices rather than rounded floats so that key
/// equality is bit-exact on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridKey {
    /// Latitude bucket index, `round(latitude / resolution)`
    pub lat_index: i64,
    /// Longitude bucket index, `round(longitude / resolution)`
    pub lon_index: i64,
}

impl GridKey {
    pub fn new(lat_index: i64, lon_index: i64) -> Self {
        Self {
            lat_index,
            lon_index,
        }
    }

    /// Returns the key of the cell containing `coord` at the given resolution.
    ///
    /// # Example
    /// ```
    /// use geoheat::GridKey;
    ///
    /// let key = GridKey::from_coordinate(&(40.001, -73.001), 0.01);
    /// assert_eq!(key, GridKey::new(4000, -7300));
    /// ```
    pub fn from_coordinate<C: Coordinate>(coord: &C, resolution: f64) -> Self {
        Self {
            lat_index: bucket_index(coord.latitude(), resolution),
            lon_index: bucket_index(coord.longitude(), resolution),
        }
    }

    /// Latitude of the bucket's representative coordinate.
    pub fn latitude(&self, resolution: f64) -> f64 {
        self.lat_index as f64 * resolution
    }

    /// Longitude of the bucket's representative coordinate.
    pub fn longitude(&self, resolution: f64) -> f64 {
        self.lon_index as f64 * resolution
    }

    /// Encodes this key and its resolution as a URL-safe cell identifier.
    pub fn to_identifier(&self, resolution: f64) -> String {
        generate_cell_identifier(self, resolution)
    }

    /// Restores a key and its resolution from a cell identifier.
    pub fn from_identifier(id: &str) -> Result<(Self, f64), HeatmapError> {
        let (_, key, resolution) = decode_cell_identifier(id)?;
        Ok((key, resolution))
    }
}
