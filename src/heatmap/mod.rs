mod cache;

pub use cache::CachedComposer;

use crate::cluster::{DensityCluster, aggregate};
use crate::config::HeatmapConfig;
use crate::coord::{Coordinate, Viewport, project};
use crate::error::HeatmapError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A filled circle ready for the renderer, in viewport pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawableCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Opacity, 0 (transparent) to 255 (opaque)
    pub alpha: u8,
    /// RGB fill color
    pub color: [u8; 3],
    /// Number of samples in the cluster this circle represents
    pub count: u32,
}

/// Whether a frame could be drawn against its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    Drawn,
    /// The viewport had a zero span; the frame is empty and the caller should retry later.
    InvalidViewport,
    /// The config failed [`HeatmapConfig::validate`]; the frame is empty.
    InvalidConfig,
}

/// The output of one composition pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapFrame {
    pub circles: Vec<DrawableCircle>,
    pub status: FrameStatus,
}

impl HeatmapFrame {
    fn empty(status: FrameStatus) -> Self {
        Self {
            circles: Vec::new(),
            status,
        }
    }

    pub fn is_drawn(&self) -> bool {
        self.status == FrameStatus::Drawn
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<DrawableCircle>, HeatmapError> {
        match self.status {
            FrameStatus::Drawn => Ok(self.circles),
            FrameStatus::InvalidViewport => Err(HeatmapError::InvalidViewport),
            FrameStatus::InvalidConfig => Err(HeatmapError::InvalidConfig(
                "frame composed with an invalid config".to_string(),
            )),
        }
    }
}

/// Opacity for a cluster of `count` samples.
///
/// Linear ramp from 0 at `count == 0` to 255 at `count >= saturation`, then flat.
pub fn intensity_alpha(count: u32, saturation: f64) -> u8 {
    let normalized = (count as f64 / saturation).min(1.0);
    (normalized * 255.0).round() as u8
}

/// Circle radius for a cluster of `count` samples. Grows without bound.
pub fn circle_radius(count: u32, radius_scale: f32) -> f32 {
    count as f32 * radius_scale
}

/// Aggregates `samples` and turns each cluster into a circle positioned in `viewport`.
///
/// An invalid viewport yields an empty frame with [`FrameStatus::InvalidViewport`],
/// a config that fails validation one with [`FrameStatus::InvalidConfig`].
///
/// # Example
/// ```
/// use geoheat::{HeatmapConfig, Viewport, compose};
///
/// let samples = [(40.001, -73.001), (40.002, -73.002), (40.100, -73.100)];
/// let viewport = Viewport::new(&(40.05, -73.05), 0.2, 0.2, 400.0, 400.0);
///
/// let frame = compose(&samples, &viewport, &HeatmapConfig::default());
/// assert!(frame.is_drawn());
/// assert_eq!(frame.len(), 2);
/// ```
pub fn compose<C: Coordinate>(
    samples: &[C],
    viewport: &Viewport,
    config: &HeatmapConfig,
) -> HeatmapFrame {
    if let Err(e) = config.validate() {
        warn!(error = %e, "rejecting heatmap config, skipping heatmap pass");
        return HeatmapFrame::empty(FrameStatus::InvalidConfig);
    }
    if !viewport.is_valid() {
        warn!(?viewport, "viewport not established, skipping heatmap pass");
        return HeatmapFrame::empty(FrameStatus::InvalidViewport);
    }

    let clusters = aggregate(samples, config.grid_resolution_degrees);
    match circles_for_clusters(&clusters, viewport, config) {
        Ok(circles) => {
            debug!(circles = circles.len(), "composed heatmap frame");
            HeatmapFrame {
                circles,
                status: FrameStatus::Drawn,
            }
        }
        Err(e) => {
            warn!(error = %e, "heatmap projection failed");
            HeatmapFrame::empty(FrameStatus::InvalidViewport)
        }
    }
}

/// Projects already-aggregated clusters into circles.
pub fn circles_for_clusters(
    clusters: &[DensityCluster],
    viewport: &Viewport,
    config: &HeatmapConfig,
) -> Result<Vec<DrawableCircle>, HeatmapError> {
    clusters
        .iter()
        .map(|cluster| {
            let px = project(cluster, viewport)?;
            Ok(DrawableCircle {
                x: px.x,
                y: px.y,
                radius: circle_radius(cluster.count, config.radius_scale),
                alpha: intensity_alpha(cluster.count, config.saturation_count),
                color: config.fill_color,
                count: cluster.count,
            })
        })
        .collect()
}
