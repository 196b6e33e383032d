pub mod csv;
pub mod geojson;

pub use self::csv::{append_sample_csv, read_samples_csv, write_samples_csv};
pub use self::geojson::clusters_to_geojson;
