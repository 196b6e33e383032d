//! # geoheat
//!
//! Turns a set of geographic samples into heatmap circles for a map viewport.
//! The pipeline has three steps, each usable on its own.
//!
//! ### 1. `aggregate` - Grid Clustering
//!
//! ```
//! use geoheat::aggregate;
//!
//! let samples = [(40.001, -73.001), (40.002, -73.002), (40.100, -73.100)];
//! let clusters = aggregate(&samples, 0.01);
//!
//! for cluster in &clusters {
//!     println!("({}, {}) x{}", cluster.latitude, cluster.longitude, cluster.count);
//! }
//! ```
//!
//! ### 2. `project` - Viewport Projection
//!
//! ```
//! use geoheat::{Viewport, project};
//!
//! # fn main() -> Result<(), geoheat::HeatmapError> {
//! let viewport = Viewport::new(&(40.0, -73.0), 0.04, 0.04, 200.0, 200.0);
//! let px = project(&(40.0, -73.0), &viewport)?;
//! assert!((px.x - 100.0).abs() < 0.01);
//! assert!((px.y - 100.0).abs() < 0.01);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `compose` - Heatmap Circles
//!
//! ```
//! use geoheat::{HeatmapConfig, Viewport, compose};
//!
//! let samples = [(40.001, -73.001), (40.002, -73.002)];
//! let viewport = Viewport::new(&(40.0, -73.0), 0.1, 0.1, 400.0, 400.0);
//! let config = HeatmapConfig::default().saturation(2.0);
//!
//! let frame = compose(&samples, &viewport, &config);
//! assert_eq!(frame.circles[0].alpha, 255);
//! ```
//!
//! For redraw loops, [`CachedComposer`] memoizes frames on the sample-set
//! version and the viewport.

pub mod cluster;
pub mod config;
pub mod coord;
pub mod error;
pub mod heatmap;
pub mod index;
pub mod io;
pub mod sample;

pub use cluster::{DensityCluster, aggregate, aggregate_par};
pub use config::HeatmapConfig;
pub use coord::{Coordinate, PixelPoint, Viewport, project};
pub use error::HeatmapError;
pub use heatmap::{
    CachedComposer, DrawableCircle, FrameStatus, HeatmapFrame, circle_radius,
    circles_for_clusters, compose, intensity_alpha,
};
pub use index::{GridKey, bucket_index, decode_cell_identifier, generate_cell_identifier};
pub use io::{append_sample_csv, clusters_to_geojson, read_samples_csv, write_samples_csv};
pub use sample::{LocationSample, SampleSet};

pub use geo_types;
