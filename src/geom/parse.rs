use super::representative_points;
use crate::error::Grid36Error;
use geo_types::{Coord, Geometry, GeometryCollection};
use geojson::GeoJson;
use wkt::TryFromWkt;

/// Text encoding of a geometry cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryText {
    Wkt,
    GeoJson,
}

impl GeometryText {
    /// Sniffs the encoding: a leading `{` is GeoJSON, anything else WKT.
    pub fn detect(s: &str) -> Result<Self, Grid36Error> {
        match s.trim_start().chars().next() {
            None => Err(Grid36Error::GeometryParse("empty geometry".to_string())),
            Some('{') => Ok(GeometryText::GeoJson),
            Some(_) => Ok(GeometryText::Wkt),
        }
    }

    pub fn parse(self, s: &str) -> Result<Geometry<f64>, Grid36Error> {
        match self {
            GeometryText::Wkt => parse_wkt(s),
            GeometryText::GeoJson => parse_geojson(s),
        }
    }
}

/// Parses a WKT or GeoJSON string, detecting which one it is.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, Grid36Error> {
    let s = s.trim();
    GeometryText::detect(s)?.parse(s)
}

/// Parses a geometry string straight into the points that place it on the grid.
///
/// See [`representative_points`]. A geometry that yields no point at all,
/// such as an empty collection, is an error since it cannot be tiled.
pub fn parse_tile_points(s: &str) -> Result<Vec<Coord<f64>>, Grid36Error> {
    let points = representative_points(&parse_geometry(s)?)?;
    if points.is_empty() {
        return Err(Grid36Error::GeometryParse(
            "geometry has no points to place on the grid".to_string(),
        ));
    }
    Ok(points)
}

/// Parses GeoJSON. Features contribute their geometry and feature
/// collections become a geometry collection.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, Grid36Error> {
    let geojson = s
        .parse::<GeoJson>()
        .map_err(|e| Grid36Error::GeometryParse(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => convert_geojson(geom),
        GeoJson::Feature(feature) => feature_geometry(feature),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(feature_geometry)
            .collect::<Result<Vec<_>, _>>()
            .map(|geoms| Geometry::GeometryCollection(GeometryCollection(geoms))),
    }
}

fn feature_geometry(feature: geojson::Feature) -> Result<Geometry<f64>, Grid36Error> {
    let geom = feature
        .geometry
        .ok_or_else(|| Grid36Error::GeometryParse("feature without geometry".to_string()))?;
    convert_geojson(geom)
}

fn convert_geojson(geom: geojson::Geometry) -> Result<Geometry<f64>, Grid36Error> {
    Geometry::try_from(geom).map_err(|e| Grid36Error::GeometryParse(e.to_string()))
}

/// Parses WKT.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, Grid36Error> {
    Geometry::try_from_wkt_str(s).map_err(|e| Grid36Error::GeometryParse(e.to_string()))
}
