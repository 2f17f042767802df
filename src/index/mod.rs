pub mod constants;
mod domain;
mod identifier;
mod indexing;

pub use constants::{
    FILLER_SYMBOL, FULL_RESOLUTION, MAX_DEPTH, MIN_DEPTH, POW6, RESERVED_ID, SUBDIVISION,
    SYMBOL_GRID, tile_scale,
};
pub use domain::DomainBounds;
pub use identifier::{
    decode_tile_identifier, generate_tile_identifier, normalize_tile_identifier,
    tile_index_to_identifier,
};
pub use indexing::{TileIndex, cell_to_planar, planar_to_cell, tiles_per_axis, validate_depth};
