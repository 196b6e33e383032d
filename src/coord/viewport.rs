use crate::coord::Coordinate;
use crate::error::HeatmapError;
use crate::index::{DEFAULT_GRID_RESOLUTION, EARTH_RADIUS_KM};
use geo::BoundingRect;
use geo_types::{MultiPoint, Point, Rect, coord};
use serde::{Deserialize, Serialize};

/// A position in viewport pixel space, origin at the top-left corner.
///
/// There is no validity range: coordinates outside the viewport project to
/// points outside `[0, pixel_width] x [0, pixel_height]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    /// Sentinel for "no projection". Also a legitimate projection result, so
    /// callers must look at the `Result` of [`project`] rather than this value.
    pub const ORIGIN: PixelPoint = PixelPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The visible geographic rectangle of a map and its size in pixels.
///
/// The rectangle is centered on `(center_latitude, center_longitude)`; the span
/// fields give its full height and width in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_span_degrees: f64,
    pub longitude_span_degrees: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl Viewport {
    pub fn new(
        center: &impl Coordinate,
        latitude_span_degrees: f64,
        longitude_span_degrees: f64,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Self {
        Self {
            center_latitude: center.latitude(),
            center_longitude: center.longitude(),
            latitude_span_degrees,
            longitude_span_degrees,
            pixel_width,
            pixel_height,
        }
    }

    /// Builds a viewport showing `radius_km` around `center` in every direction.
    ///
    /// The latitude span covers twice the radius as an arc of a great circle; the
    /// longitude span is widened by `1 / cos(latitude)` to cover the same ground
    /// distance away from the equator.
    ///
    /// # Example
    /// ```
    /// use geoheat::Viewport;
    ///
    /// let viewport = Viewport::from_center_and_radius(&(0.0, 0.0), 1.0, 400.0, 400.0);
    /// assert!((viewport.latitude_span_degrees - 0.018).abs() < 0.001);
    /// ```
    pub fn from_center_and_radius(
        center: &impl Coordinate,
        radius_km: f64,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Self {
        let circumference_km = 2.0 * std::f64::consts::PI * EARTH_RADIUS_KM;
        let latitude_span = 2.0 * radius_km / circumference_km * 360.0;
        let longitude_span = latitude_span / center.latitude().to_radians().cos();

        Self::new(
            center,
            latitude_span,
            longitude_span,
            pixel_width,
            pixel_height,
        )
    }

    /// Builds a viewport framing the bounding box of `coords`.
    ///
    /// A degenerate extent (a single location, or samples along one line) is
    /// widened to at least one default grid cell so the viewport stays valid.
    /// Returns `None` when `coords` is empty.
    pub fn fit_to_samples<C: Coordinate>(
        coords: &[C],
        pixel_width: f64,
        pixel_height: f64,
    ) -> Option<Self> {
        let points: MultiPoint<f64> = coords
            .iter()
            .map(|c| Point::new(c.longitude(), c.latitude()))
            .collect::<Vec<_>>()
            .into();
        let rect = points.bounding_rect()?;
        let center = rect.center();

        Some(Self {
            center_latitude: center.y,
            center_longitude: center.x,
            latitude_span_degrees: rect.height().max(DEFAULT_GRID_RESOLUTION),
            longitude_span_degrees: rect.width().max(DEFAULT_GRID_RESOLUTION),
            pixel_width,
            pixel_height,
        })
    }

    /// False while the map has not established a visible region yet.
    pub fn is_valid(&self) -> bool {
        self.latitude_span_degrees != 0.0
            && self.longitude_span_degrees != 0.0
            && self.latitude_span_degrees.is_finite()
            && self.longitude_span_degrees.is_finite()
    }

    /// Western edge of the viewport in degrees.
    pub fn left(&self) -> f64 {
        self.center_longitude - self.longitude_span_degrees / 2.0
    }

    /// Northern edge of the viewport in degrees.
    pub fn top(&self) -> f64 {
        self.center_latitude + self.latitude_span_degrees / 2.0
    }

    /// The visible rectangle as a `geo_types::Rect` (x = longitude, y = latitude).
    pub fn bounds(&self) -> Rect<f64> {
        let half_lat = self.latitude_span_degrees / 2.0;
        let half_lon = self.longitude_span_degrees / 2.0;
        Rect::new(
            coord! { x: self.center_longitude - half_lon, y: self.center_latitude - half_lat },
            coord! { x: self.center_longitude + half_lon, y: self.center_latitude + half_lat },
        )
    }

    pub fn project(&self, coord: &impl Coordinate) -> Result<PixelPoint, HeatmapError> {
        project(coord, self)
    }
}

/// Maps a geographic coordinate to a pixel position inside `viewport`.
///
/// Longitude maps linearly onto x from the left edge; latitude maps onto y from
/// the top edge, inverted because pixel rows grow downwards. No clamping is done.
///
/// # Errors
///
/// [`HeatmapError::InvalidViewport`] when either span is zero or not finite.
///
/// # Example
/// ```
/// use geoheat::{Viewport, project};
///
/// # fn main() -> Result<(), geoheat::HeatmapError> {
/// let viewport = Viewport::new(&(40.0, -73.0), 0.04, 0.04, 200.0, 200.0);
/// let px = project(&(40.01, -73.01), &viewport)?;
/// assert!((px.x - 50.0).abs() < 0.01);
/// assert!((px.y - 50.0).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
pub fn project(coord: &impl Coordinate, viewport: &Viewport) -> Result<PixelPoint, HeatmapError> {
    if !viewport.is_valid() {
        return Err(HeatmapError::InvalidViewport);
    }

    let x = (coord.longitude() - viewport.left()) / viewport.longitude_span_degrees
        * viewport.pixel_width;
    let y = (viewport.top() - coord.latitude()) / viewport.latitude_span_degrees
        * viewport.pixel_height;

    Ok(PixelPoint::new(x as f32, y as f32))
}
