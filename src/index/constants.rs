/// Identifier version for encoding/decoding grid cell ids
pub const IDENTIFIER_VERSION: u8 = 1;

/// Scale factor storing grid resolutions as integer micro-degrees
pub(crate) const RESOLUTION_SCALE: f64 = 1_000_000.0;

/// Default grid resolution in degrees (roughly 1 km of latitude)
pub const DEFAULT_GRID_RESOLUTION: f64 = 0.01;

/// Default cluster count at which alpha saturates
pub const DEFAULT_SATURATION_COUNT: f64 = 10.0;

/// Default circle radius (in pixels) per sample in a cluster
pub const DEFAULT_RADIUS_SCALE: f32 = 5.0;

/// Default circle fill color (RGB)
pub const DEFAULT_FILL_COLOR: [u8; 3] = [255, 0, 0];

/// Mean Earth radius in kilometres, used to size viewports from a distance
pub const EARTH_RADIUS_KM: f64 = 6371.0;
