mod viewport;

pub use viewport::{PixelPoint, Viewport, project};

use geo_types::{Coord, Point};

/// Trait for types that can provide a geographic latitude/longitude.
///
/// Implemented for `(latitude, longitude)` tuples and for `geo_types` points and
/// coords (where `x` is longitude and `y` is latitude). This allows the grid and
/// projection functions to accept either.
pub trait Coordinate {
    /// Returns the latitude in degrees.
    fn latitude(&self) -> f64;
    /// Returns the longitude in degrees.
    fn longitude(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn latitude(&self) -> f64 {
        self.0
    }
    fn longitude(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn latitude(&self) -> f64 {
        self.y()
    }
    fn longitude(&self) -> f64 {
        self.x()
    }
}

impl Coordinate for Coord<f64> {
    fn latitude(&self) -> f64 {
        self.y
    }
    fn longitude(&self) -> f64 {
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (40.0, -73.0);
        assert_eq!(tuple.latitude(), 40.0);
        assert_eq!(tuple.longitude(), -73.0);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let pt = point! { x: -73.0, y: 40.0 };
        assert_eq!(pt.latitude(), 40.0);
        assert_eq!(pt.longitude(), -73.0);
    }

    #[test]
    fn test_coordinate_trait_coord() {
        let c = coord! { x: -73.0, y: 40.0 };
        assert_eq!(c.latitude(), 40.0);
        assert_eq!(c.longitude(), -73.0);
    }
}
