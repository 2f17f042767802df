use crate::error::Grid36Error;
use geo::Centroid;
use geo_types::{Coord, Geometry, LineString, Polygon, Rect};

/// Closed square ring for `rect`, counter-clockwise from the lower-left corner.
pub fn square_polygon(rect: &Rect<f64>) -> Polygon<f64> {
    let (min, max) = (rect.min(), rect.max());
    let coords = vec![
        Coord { x: min.x, y: min.y },
        Coord { x: max.x, y: min.y },
        Coord { x: max.x, y: max.y },
        Coord { x: min.x, y: max.y },
        Coord { x: min.x, y: min.y },
    ];
    Polygon::new(LineString::from(coords), vec![])
}

/// Applies a fallible coordinate transform to every vertex of `polygon`.
pub fn transform_polygon<E, F>(polygon: &Polygon<f64>, mut f: F) -> Result<Polygon<f64>, E>
where
    F: FnMut(Coord<f64>) -> Result<Coord<f64>, E>,
{
    let mut ring = |line: &LineString<f64>| -> Result<LineString<f64>, E> {
        line.coords()
            .map(|c| f(*c))
            .collect::<Result<Vec<_>, E>>()
            .map(LineString::from)
    };

    let exterior = ring(polygon.exterior())?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(&mut ring)
        .collect::<Result<Vec<_>, E>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Points that stand in for `geom` when assigning it to tiles.
///
/// Points map to themselves, lines to their vertices and polygons to their
/// centroid. Collections are flattened.
pub fn representative_points(geom: &Geometry<f64>) -> Result<Vec<Coord<f64>>, Grid36Error> {
    match geom {
        Geometry::Point(pt) => Ok(vec![pt.0]),
        Geometry::MultiPoint(mp) => Ok(mp.0.iter().map(|p| p.0).collect()),
        Geometry::Line(line) => Ok(vec![line.start, line.end]),
        Geometry::LineString(line) => Ok(line.0.clone()),
        Geometry::MultiLineString(mls) => {
            Ok(mls.0.iter().flat_map(|l| l.0.iter().copied()).collect())
        }
        Geometry::Polygon(poly) => Ok(poly.centroid().map(|c| c.0).into_iter().collect()),
        Geometry::MultiPolygon(mp) => Ok(mp
            .0
            .iter()
            .filter_map(|p| p.centroid())
            .map(|c| c.0)
            .collect()),
        Geometry::Rect(rect) => Ok(vec![rect.center()]),
        Geometry::GeometryCollection(gc) => {
            let mut points = Vec::new();
            for g in &gc.0 {
                points.extend(representative_points(g)?);
            }
            Ok(points)
        }
        _ => Err(Grid36Error::GeometryParse(
            "Unsupported geometry type".to_string(),
        )),
    }
}

pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}
