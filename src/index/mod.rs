pub mod constants;
mod grid;
mod identifier;

pub use constants::{
    DEFAULT_FILL_COLOR, DEFAULT_GRID_RESOLUTION, DEFAULT_RADIUS_SCALE, DEFAULT_SATURATION_COUNT,
    EARTH_RADIUS_KM, IDENTIFIER_VERSION,
};
pub use grid::{GridKey, bucket_index};
pub use identifier::{decode_cell_identifier, generate_cell_identifier};
