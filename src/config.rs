use crate::error::HeatmapError;
use crate::index::{
    DEFAULT_FILL_COLOR, DEFAULT_GRID_RESOLUTION, DEFAULT_RADIUS_SCALE, DEFAULT_SATURATION_COUNT,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning knobs for clustering and intensity mapping.
///
/// Deserializes from JSON with camelCase keys; any missing key takes its default.
///
/// # Example
/// ```
/// use geoheat::HeatmapConfig;
///
/// let config = HeatmapConfig::default()
///     .grid_resolution(0.05)
///     .saturation(20.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatmapConfig {
    /// Size of a grid cell in degrees. Coarser cells give fewer, larger, more saturated markers.
    pub grid_resolution_degrees: f64,
    /// Cluster count at which alpha reaches 255.
    pub saturation_count: f64,
    /// Circle radius in pixels per sample in the cluster.
    pub radius_scale: f32,
    /// RGB fill color of every circle.
    pub fill_color: [u8; 3],
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            grid_resolution_degrees: DEFAULT_GRID_RESOLUTION,
            saturation_count: DEFAULT_SATURATION_COUNT,
            radius_scale: DEFAULT_RADIUS_SCALE,
            fill_color: DEFAULT_FILL_COLOR,
        }
    }
}

impl HeatmapConfig {
    pub fn grid_resolution(mut self, degrees: f64) -> Self {
        self.grid_resolution_degrees = degrees;
        self
    }

    pub fn saturation(mut self, count: f64) -> Self {
        self.saturation_count = count;
        self
    }

    pub fn radius_scale(mut self, scale: f32) -> Self {
        self.radius_scale = scale;
        self
    }

    pub fn fill_color(mut self, rgb: [u8; 3]) -> Self {
        self.fill_color = rgb;
        self
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(s: &str) -> Result<Self, HeatmapError> {
        let config: HeatmapConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, HeatmapError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), HeatmapError> {
        if !(self.grid_resolution_degrees.is_finite() && self.grid_resolution_degrees > 0.0) {
            return Err(HeatmapError::InvalidConfig(format!(
                "grid resolution must be positive, got {}",
                self.grid_resolution_degrees
            )));
        }
        if !(self.saturation_count.is_finite() && self.saturation_count > 0.0) {
            return Err(HeatmapError::InvalidConfig(format!(
                "saturation count must be positive, got {}",
                self.saturation_count
            )));
        }
        if !(self.radius_scale.is_finite() && self.radius_scale >= 0.0) {
            return Err(HeatmapError::InvalidConfig(format!(
                "radius scale must not be negative, got {}",
                self.radius_scale
            )));
        }
        Ok(())
    }
}
