use crate::coord::{Coordinate, GeoPoint, PlanarPoint, Projection};
use crate::error::Grid36Error;
use crate::grid::Grid36;
use crate::index::{TileIndex, validate_depth};
use crate::tile::TileRecord;
use geo_types::{Polygon, Rect};

/// Covers larger than this are refused
pub const MAX_COVER_TILES: i64 = 1_000_000;

/// All tiles at one depth that intersect an extent.
#[derive(Debug, Clone)]
pub struct TileCover {
    tiles: Vec<TileRecord>,
    depth: u8,
}

impl TileCover {
    pub fn builder() -> TileCoverBuilder {
        TileCoverBuilder::new()
    }

    /// Tiles intersecting a planar extent.
    pub fn from_planar_extent<P: Projection>(
        grid: &Grid36<P>,
        min: &impl Coordinate,
        max: &impl Coordinate,
        depth: u8,
    ) -> Result<Self, Grid36Error> {
        validate_depth(depth)?;
        let lower = grid.tile_index_at(&PlanarPoint::new(min.x(), min.y()), depth)?;
        let upper = grid.tile_index_at(&PlanarPoint::new(max.x(), max.y()), depth)?;

        let (col_min, col_max) = (lower.col.min(upper.col), lower.col.max(upper.col));
        let (row_min, row_max) = (lower.row.min(upper.row), lower.row.max(upper.row));

        let count = (col_max - col_min + 1) * (row_max - row_min + 1);
        if count > MAX_COVER_TILES {
            return Err(Grid36Error::InvalidExtent(format!(
                "extent needs {} tiles at depth {}, limit is {}",
                count, depth, MAX_COVER_TILES
            )));
        }

        let mut tiles = Vec::with_capacity(count as usize);
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                let tile = TileIndex::new(col, row, depth)?;
                tiles.push(grid.record_for_index(&tile)?);
            }
        }

        Ok(Self { tiles, depth })
    }

    /// Tiles intersecting a longitude/latitude box.
    ///
    /// The four corners are projected and their planar bounding box is covered,
    /// which may include a margin around the curved edges.
    pub fn from_geo_extent<P: Projection>(
        grid: &Grid36<P>,
        min: &GeoPoint,
        max: &GeoPoint,
        depth: u8,
    ) -> Result<Self, Grid36Error> {
        let corners = [
            GeoPoint::new(min.longitude, min.latitude),
            GeoPoint::new(max.longitude, min.latitude),
            GeoPoint::new(max.longitude, max.latitude),
            GeoPoint::new(min.longitude, max.latitude),
        ];
        let projected = corners
            .iter()
            .map(|c| grid.projection().to_plane(c))
            .collect::<Result<Vec<_>, _>>()?;

        let x_min = projected.iter().map(|p| p.easting).fold(f64::INFINITY, f64::min);
        let y_min = projected.iter().map(|p| p.northing).fold(f64::INFINITY, f64::min);
        let x_max = projected.iter().map(|p| p.easting).fold(f64::NEG_INFINITY, f64::max);
        let y_max = projected.iter().map(|p| p.northing).fold(f64::NEG_INFINITY, f64::max);

        Self::from_planar_extent(grid, &(x_min, y_min), &(x_max, y_max), depth)
    }

    pub fn from_rect<P: Projection>(
        grid: &Grid36<P>,
        rect: &Rect<f64>,
        depth: u8,
    ) -> Result<Self, Grid36Error> {
        let (min, max) = (rect.min(), rect.max());
        Self::from_planar_extent(grid, &(min.x, min.y), &(max.x, max.y), depth)
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tiles.iter().map(|t| t.id.as_str()).collect()
    }

    /// The tile of this cover containing a planar point, if any.
    pub fn get_tile_at(&self, point: &impl Coordinate) -> Option<&TileRecord> {
        let p = PlanarPoint::new(point.x(), point.y());
        self.tiles.iter().find(|tile| tile.contains_planar(&p))
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.tiles.iter().map(|tile| tile.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&TileRecord>
    where
        F: Fn(&TileRecord) -> bool,
    {
        self.tiles.iter().filter(|tile| predicate(tile)).collect()
    }
}

#[derive(Debug, Default)]
pub struct TileCoverBuilder {
    depth: Option<u8>,
    min: Option<(f64, f64)>,
    max: Option<(f64, f64)>,
}

impl TileCoverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn planar_extent(mut self, min: &impl Coordinate, max: &impl Coordinate) -> Self {
        self.min = Some((min.x(), min.y()));
        self.max = Some((max.x(), max.y()));
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.min = Some((rect.min().x, rect.min().y));
        self.max = Some((rect.max().x, rect.max().y));
        self
    }

    pub fn build<P: Projection>(self, grid: &Grid36<P>) -> Result<TileCover, Grid36Error> {
        let depth = self
            .depth
            .ok_or_else(|| Grid36Error::InvalidExtent("depth must be set".to_string()))?;
        let (min, max) = self
            .min
            .zip(self.max)
            .ok_or_else(|| Grid36Error::InvalidExtent("extent must be set".to_string()))?;

        TileCover::from_planar_extent(grid, &min, &max, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    fn grid() -> Grid36 {
        Grid36::australia().unwrap()
    }

    #[test]
    fn test_cover_from_planar_extent() -> Result<(), Grid36Error> {
        let g = grid();
        let cover = TileCover::from_planar_extent(
            &g,
            &(1_550_000.0, -3_958_000.0),
            &(1_560_000.0, -3_950_000.0),
            5,
        )?;
        assert!(!cover.is_empty());
        assert_eq!(cover.depth(), 5);
        for tile in cover.iter() {
            assert_eq!(tile.depth, 5);
            assert_eq!(tile.tile_size_meters, 1296.0);
        }
        // 1296 m tiles over a 10 km x 8 km box
        assert!(cover.len() >= 8 * 7 && cover.len() <= 10 * 9);
        Ok(())
    }

    #[test]
    fn test_cover_ids_are_unique() -> Result<(), Grid36Error> {
        let g = grid();
        let cover = TileCover::from_planar_extent(&g, &(0.0, -100_000.0), &(50_000.0, 0.0), 4)?;
        let mut ids = cover.ids();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
        Ok(())
    }

    #[test]
    fn test_cover_from_geo_extent() -> Result<(), Grid36Error> {
        let g = grid();
        let cover = TileCover::from_geo_extent(
            &g,
            &GeoPoint::new(149.0, -35.4),
            &GeoPoint::new(149.3, -35.1),
            4,
        )?;
        let canberra = g.encode(&(149.13, -35.28), 4)?;
        assert!(cover.ids().contains(&canberra.id.as_str()));
        Ok(())
    }

    #[test]
    fn test_cover_from_rect_and_builder() -> Result<(), Grid36Error> {
        let g = grid();
        let rect = Rect::new(
            coord! { x: 1_550_000.0, y: -3_958_000.0 },
            coord! { x: 1_560_000.0, y: -3_950_000.0 },
        );
        let a = TileCover::from_rect(&g, &rect, 5)?;
        let b = TileCover::builder().depth(5).rect(&rect).build(&g)?;
        assert_eq!(a.ids(), b.ids());

        assert!(TileCover::builder().rect(&rect).build(&g).is_err());
        assert!(TileCover::builder().depth(5).build(&g).is_err());
        Ok(())
    }

    #[test]
    fn test_get_tile_at() -> Result<(), Grid36Error> {
        let g = grid();
        let cover = TileCover::from_planar_extent(
            &g,
            &(1_550_000.0, -3_958_000.0),
            &(1_560_000.0, -3_950_000.0),
            5,
        )?;
        let pt = point! { x: 1_550_570.6, y: -3_957_368.6 };
        let tile = cover.get_tile_at(&pt);
        assert_eq!(tile.map(|t| t.id.as_str()), Some("FHKDX"));
        assert!(cover.get_tile_at(&(0.0, 0.0)).is_none());
        Ok(())
    }

    #[test]
    fn test_filter_and_polygons() -> Result<(), Grid36Error> {
        let g = grid();
        let cover = TileCover::from_planar_extent(
            &g,
            &(1_550_000.0, -3_958_000.0),
            &(1_560_000.0, -3_950_000.0),
            5,
        )?;
        let east = cover.filter(|t| t.easting() > 1_555_000.0);
        assert!(!east.is_empty());
        assert!(east.len() < cover.len());
        assert_eq!(cover.to_polygons().len(), cover.len());
        Ok(())
    }

    #[test]
    fn test_oversized_cover_rejected() {
        let g = grid();
        let d = *g.domain();
        let result =
            TileCover::from_planar_extent(&g, &(d.x_min(), d.y_min()), &(d.x_max(), d.y_max()), 5);
        assert!(matches!(result, Err(Grid36Error::InvalidExtent(_))));
    }
}
