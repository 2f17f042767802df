mod geometry;
mod parse;

pub use geometry::{
    polygon_to_geojson, polygon_to_wkt, representative_points, square_polygon, transform_polygon,
};
pub use parse::{GeometryText, parse_geojson, parse_geometry, parse_tile_points, parse_wkt};
