/// Error type for geoheat operations.
#[derive(Debug, thiserror::Error)]
pub enum HeatmapError {
    /// The viewport has a zero (or non-finite) latitude or longitude span.
    #[error("Invalid viewport: latitude and longitude spans must be non-zero")]
    InvalidViewport,
    /// A configuration value is out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV parsing, reading or writing error.
    #[error("CSV error: {0}")]
    Csv(String),
    /// JSON (config or GeoJSON) error.
    #[error("JSON error: {0}")]
    Json(String),
    /// The grid cell identifier could not be decoded.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl From<csv::Error> for HeatmapError {
    fn from(e: csv::Error) -> Self {
        HeatmapError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(e: serde_json::Error) -> Self {
        HeatmapError::Json(e.to_string())
    }
}
