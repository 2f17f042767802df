use crate::coord::{GeoPoint, PlanarPoint, Projection};
use crate::error::Grid36Error;
use crate::geom::{square_polygon, transform_polygon};
use crate::index::{DomainBounds, RESERVED_ID, TileIndex, cell_to_planar, planar_to_cell};
use geo_types::{Polygon, Rect, coord};
use geojson::{Feature, feature::Id};
use serde::{Deserialize, Serialize};

/// Planar extent of a tile in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileBounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl TileBounds {
    /// Half-open containment, matching how points are assigned to tiles.
    pub fn contains(&self, p: &PlanarPoint) -> bool {
        self.x_min <= p.easting
            && p.easting < self.x_max
            && self.y_min <= p.northing
            && p.northing < self.y_max
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.x_min, y: self.y_min },
            coord! { x: self.x_max, y: self.y_max },
        )
    }
}

/// A single tile of the grid36 index.
///
/// Produced by encoding a point or decoding an ID. Encoding and decoding build
/// the geometry the same way, so both agree on size, origin and centroid.
///
/// # Example
///
/// ```
/// use grid36_rs::{decode_tile, encode_tile};
///
/// # fn main() -> Result<(), grid36_rs::Grid36Error> {
/// let tile = encode_tile(149.13, -35.28, 6)?;
/// assert_eq!(tile.id, "FHKDX9");
///
/// let restored = decode_tile(&tile.id)?;
/// assert_eq!(restored.origin_index, tile.origin_index);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Canonical upper-case tile ID
    pub id: String,
    /// Number of symbols in the ID (1-9)
    pub depth: u8,
    /// Side length in meters
    pub tile_size_meters: f64,
    /// Lower-left full-resolution cell `(i, j)`
    pub origin_index: (i64, i64),
    /// Centroid in the projected plane
    pub centroid: PlanarPoint,
    /// Centroid back-projected to longitude/latitude
    pub centroid_geo: GeoPoint,
    /// Planar extent
    pub bounds: TileBounds,
    /// True when the encoded point lay outside the domain and was clamped
    pub outside_domain: bool,
}

impl TileRecord {
    pub(crate) fn from_index<P: Projection + ?Sized>(
        id: String,
        tile: &TileIndex,
        domain: &DomainBounds,
        projection: &P,
    ) -> Result<Self, Grid36Error> {
        let unit = domain.unit();
        let scale = tile.scale();
        let origin_index = tile.origin();
        let (ci, cj) = tile.centroid_cell();

        let lower_left = cell_to_planar(domain, origin_index.0, origin_index.1);
        let centroid_corner = cell_to_planar(domain, ci, cj);
        let centroid = PlanarPoint::new(
            centroid_corner.easting + 0.5 * unit,
            centroid_corner.northing + 0.5 * unit,
        );
        let side = scale as f64 * unit;

        Ok(Self {
            id,
            depth: tile.depth,
            tile_size_meters: side,
            origin_index,
            centroid,
            centroid_geo: projection.to_geo(&centroid)?,
            bounds: TileBounds {
                x_min: lower_left.easting,
                y_min: lower_left.northing,
                x_max: lower_left.easting + side,
                y_max: lower_left.northing + side,
            },
            outside_domain: false,
        })
    }

    /// The reference tile behind the reserved all-zero ID: one full-resolution
    /// cell whose corner is the cell holding `anchor`.
    pub(crate) fn reference<P: Projection + ?Sized>(
        domain: &DomainBounds,
        anchor: &PlanarPoint,
        projection: &P,
    ) -> Result<Self, Grid36Error> {
        let (i, j, _) = planar_to_cell(domain, anchor)?;
        let leaf = TileIndex {
            col: i,
            row: j,
            depth: RESERVED_ID.len() as u8,
        };
        Self::from_index(RESERVED_ID.to_string(), &leaf, domain, projection)
    }

    pub fn is_reference(&self) -> bool {
        self.id == RESERVED_ID
    }

    /// Returns the easting of the centroid in meters.
    pub fn easting(&self) -> f64 {
        self.centroid.easting
    }

    /// Returns the northing of the centroid in meters.
    pub fn northing(&self) -> f64 {
        self.centroid.northing
    }

    pub fn contains_planar(&self, p: &PlanarPoint) -> bool {
        self.bounds.contains(p)
    }

    /// Converts this tile to a square polygon in planar coordinates.
    pub fn to_polygon(&self) -> Polygon<f64> {
        square_polygon(&self.bounds.to_rect())
    }

    /// Converts this tile to a polygon in longitude/latitude.
    ///
    /// Only the corners are back-projected, so edges are straight in degrees.
    pub fn to_geo_polygon<P: Projection + ?Sized>(
        &self,
        projection: &P,
    ) -> Result<Polygon<f64>, Grid36Error> {
        transform_polygon(&self.to_polygon(), |c| {
            projection
                .to_geo(&PlanarPoint::new(c.x, c.y))
                .map(|g| coord! { x: g.longitude, y: g.latitude })
        })
    }

    /// GeoJSON feature with the longitude/latitude outline and tile attributes.
    pub fn to_geojson_feature<P: Projection + ?Sized>(
        &self,
        projection: &P,
    ) -> Result<Feature, Grid36Error> {
        let polygon = self.to_geo_polygon(projection)?;
        let properties = serde_json::json!({
            "id": self.id,
            "depth": self.depth,
            "tile_size_meters": self.tile_size_meters,
            "origin_i": self.origin_index.0,
            "origin_j": self.origin_index.1,
            "outside_domain": self.outside_domain,
        });

        Ok(Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::from(&polygon)),
            id: Some(Id::String(self.id.clone())),
            properties: properties.as_object().cloned(),
            foreign_members: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{AlbersParams, InverseStrategy, StrategyProjection};
    use approx::assert_abs_diff_eq;

    fn projection() -> StrategyProjection {
        StrategyProjection::new(
            AlbersParams::AUSTRALIAN_ALBERS,
            InverseStrategy::ExactWithLinearFallback,
        )
        .unwrap()
    }

    #[test]
    fn test_from_index_geometry() -> Result<(), Grid36Error> {
        let domain = DomainBounds::AUSTRALIA;
        let tile = TileIndex::new(0, 0, 8)?;
        let record = TileRecord::from_index("00000000".into(), &tile, &domain, &projection())?;

        assert_eq!(record.tile_size_meters, 6.0);
        assert_eq!(record.origin_index, (0, 0));
        assert_abs_diff_eq!(record.centroid.easting, domain.x_min() + 3.5, epsilon = 1e-9);
        assert_abs_diff_eq!(record.bounds.x_max - record.bounds.x_min, 6.0, epsilon = 1e-9);
        assert!(record.contains_planar(&record.centroid));
        Ok(())
    }

    #[test]
    fn test_reference_tile() -> Result<(), Grid36Error> {
        let domain = DomainBounds::AUSTRALIA;
        let record = TileRecord::reference(&domain, &PlanarPoint::new(0.0, 0.0), &projection())?;

        assert!(record.is_reference());
        assert_eq!(record.depth, 9);
        assert_eq!(record.tile_size_meters, 1.0);
        assert_eq!(record.origin_index, (5038848, 8038848));
        assert_abs_diff_eq!(record.bounds.x_min, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(record.bounds.y_min, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(record.centroid_geo.longitude, 132.0, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn test_polygons() -> Result<(), Grid36Error> {
        let domain = DomainBounds::AUSTRALIA;
        let tile = TileIndex::new(20, 25, 2)?;
        let proj = projection();
        let record = TileRecord::from_index("XX".into(), &tile, &domain, &proj)?;

        let planar = record.to_polygon();
        assert_eq!(planar.exterior().coords().count(), 5);

        let geo = record.to_geo_polygon(&proj)?;
        for c in geo.exterior().coords() {
            assert!(c.x > 100.0 && c.x < 170.0);
            assert!(c.y > -60.0 && c.y < 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_geojson_feature() -> Result<(), Grid36Error> {
        let domain = DomainBounds::AUSTRALIA;
        let tile = TileIndex::new(3, 3, 1)?;
        let proj = projection();
        let record = TileRecord::from_index("K".into(), &tile, &domain, &proj)?;

        let feature = record.to_geojson_feature(&proj)?;
        assert!(feature.geometry.is_some());
        let props = feature.properties.unwrap();
        assert_eq!(props.get("id").and_then(|v| v.as_str()), Some("K"));
        assert_eq!(props.get("depth").and_then(|v| v.as_u64()), Some(1));
        Ok(())
    }

    #[test]
    fn test_serde_roundtrip() -> Result<(), Grid36Error> {
        let domain = DomainBounds::AUSTRALIA;
        let tile = TileIndex::new(3, 3, 1)?;
        let record = TileRecord::from_index("K".into(), &tile, &domain, &projection())?;

        let json = serde_json::to_string(&record).map_err(|e| Grid36Error::Io(e.to_string()))?;
        let back: TileRecord =
            serde_json::from_str(&json).map_err(|e| Grid36Error::Io(e.to_string()))?;
        assert_eq!(back.id, record.id);
        assert_eq!(back.origin_index, record.origin_index);
        assert_abs_diff_eq!(back.centroid.easting, record.centroid.easting, epsilon = 1e-6);
        assert_abs_diff_eq!(
            back.centroid_geo.latitude,
            record.centroid_geo.latitude,
            epsilon = 1e-9
        );
        Ok(())
    }
}
