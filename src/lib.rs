//! # grid36-rs
//!
//! A hierarchical square tile index over a projected plane. Each tile ID
//! character picks one of 36 children (6 x 6) of the previous tile, so an
//! ID of length `d` names a tile at depth `d` and every prefix names one of
//! its ancestors.
//!
//! The default grid uses Australian Albers (EPSG:3577) over a square domain
//! of 6^9 metres per side, giving 1 m tiles at depth 9.
//!
//! There are currently four main entry points.
//!
//! ### 1. Free functions on the default Australian grid
//!
//! ```
//! use grid36_rs::{adjust_tile_depth, decode_tile, encode_tile};
//!
//! # fn main() -> Result<(), grid36_rs::Grid36Error> {
//! let tile = encode_tile(149.13, -35.28, 9)?;
//! assert_eq!(tile.id, "FHKDX9REL");
//!
//! let coarse = adjust_tile_depth(&tile.id, 4)?;
//! assert_eq!(coarse, "FHKD");
//!
//! let decoded = decode_tile(&coarse)?;
//! assert_eq!(decoded.tile_size_meters, 7776.0);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `Grid36` - A Configured Index
//!
//! ```
//! use grid36_rs::{Grid36, InverseStrategy, RefinementPolicy};
//!
//! # fn main() -> Result<(), grid36_rs::Grid36Error> {
//! let grid = Grid36::builder()
//!     .inverse_strategy(InverseStrategy::Exact)
//!     .refinement(RefinementPolicy::LowerLeftChild)
//!     .build()?;
//!
//! let tile = grid.encode(&(151.2093, -33.8688), 4)?;
//! assert_eq!(grid.adjust_depth(&tile.id, 6)?, "GN1700");
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `TileCover` - Collections of Tiles
//!
//! ```
//! use grid36_rs::{Grid36, TileCover};
//! use geo_types::point;
//!
//! # fn main() -> Result<(), grid36_rs::Grid36Error> {
//! let grid = Grid36::australia()?;
//! let cover = TileCover::builder()
//!     .depth(5)
//!     .planar_extent(&(1_550_000.0, -3_958_000.0), &(1_560_000.0, -3_950_000.0))
//!     .build(&grid)?;
//!
//! let pt = point! { x: 1_550_570.6, y: -3_957_368.6 };
//! if let Some(tile) = cover.get_tile_at(&pt) {
//!     println!("{}", tile.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToTiles` - CSV File Conversion
//!
//! ```no_run
//! use grid36_rs::{Crs, CsvTileConfig, CsvToTiles, GeometryFormat, Grid36};
//!
//! let grid = Grid36::australia().unwrap();
//! let config = CsvTileConfig::new("geometry", 6)
//!     .exclude(vec!["Geo Point".into()])
//!     .crs(Crs::Wgs84)
//!     .with_tile_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_tile_csv("output.csv", &grid, &config).unwrap();
//! ```

pub mod config;
pub mod coord;
pub mod cover;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;
pub mod tile;

pub use config::{Grid36Builder, Grid36Config, RefinementPolicy};
pub use coord::{
    AlbersEqualArea, AlbersParams, Coordinate, Crs, FallbackProjection, GeoPoint, InverseStrategy,
    LinearApprox, PlanarPoint, Projection, StrategyProjection,
};
#[cfg(feature = "proj")]
pub use coord::ProjAlbers;
pub use cover::{MAX_COVER_TILES, TileCover, TileCoverBuilder};
pub use error::Grid36Error;
pub use geom::{GeometryText, parse_geojson, parse_geometry, parse_tile_points, parse_wkt};
pub use grid::Grid36;
pub use index::{
    DomainBounds, FULL_RESOLUTION, MAX_DEPTH, MIN_DEPTH, RESERVED_ID, SYMBOL_GRID, TileIndex,
    decode_tile_identifier, generate_tile_identifier, normalize_tile_identifier, tile_scale,
};
pub use io::{CoordinateSource, CsvTileConfig, CsvToTiles, GeometryFormat, csv_to_tile_csv};
pub use tile::{TileBounds, TileRecord};

pub use geo_types;

use std::sync::OnceLock;

fn default_grid() -> Result<&'static Grid36, Grid36Error> {
    static DEFAULT_GRID: OnceLock<Result<Grid36, Grid36Error>> = OnceLock::new();
    DEFAULT_GRID
        .get_or_init(Grid36::australia)
        .as_ref()
        .map_err(Clone::clone)
}

/// Projects longitude/latitude to Australian Albers easting/northing.
pub fn project_to_plane(longitude: f64, latitude: f64) -> Result<PlanarPoint, Grid36Error> {
    default_grid()?.project_to_plane(longitude, latitude)
}

/// Encodes longitude/latitude at `depth` (1-9) on the default grid.
pub fn encode_tile(longitude: f64, latitude: f64, depth: u8) -> Result<TileRecord, Grid36Error> {
    default_grid()?.encode(&(longitude, latitude), depth)
}

/// Decodes a tile ID on the default grid. `"000000000"` is the reference tile.
pub fn decode_tile(id: &str) -> Result<TileRecord, Grid36Error> {
    default_grid()?.decode(id)
}

/// Truncates or refines `id` to `new_depth` on the default grid.
pub fn adjust_tile_depth(id: &str, new_depth: u8) -> Result<String, Grid36Error> {
    default_grid()?.adjust_depth(id, new_depth)
}
