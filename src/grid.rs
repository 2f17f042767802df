use crate::config::{Grid36Builder, RefinementPolicy};
use crate::coord::{
    AlbersParams, Coordinate, GeoPoint, InverseStrategy, PlanarPoint, Projection,
    StrategyProjection,
};
use crate::error::Grid36Error;
use crate::index::{
    DomainBounds, FILLER_SYMBOL, MAX_DEPTH, RESERVED_ID, SYMBOL_GRID, TileIndex,
    decode_tile_identifier, generate_tile_identifier, normalize_tile_identifier, planar_to_cell,
    tile_index_to_identifier, validate_depth,
};
use crate::tile::TileRecord;
use rayon::prelude::*;
use tracing::{debug, warn};

/// A configured grid36 index: a projection plus the domain it tiles.
///
/// All methods are pure; a `Grid36` can be shared freely between threads.
///
/// # Example
///
/// ```
/// use grid36_rs::Grid36;
///
/// # fn main() -> Result<(), grid36_rs::Grid36Error> {
/// let grid = Grid36::builder().build()?;
/// let tile = grid.encode(&(151.2093, -33.8688), 5)?;
/// assert_eq!(tile.id, "GN17E");
/// assert_eq!(grid.adjust_depth(&tile.id, 3)?, "GN1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Grid36<P = StrategyProjection> {
    projection: P,
    domain: DomainBounds,
    refinement: RefinementPolicy,
    reference_anchor: PlanarPoint,
}

impl Grid36<StrategyProjection> {
    pub fn builder() -> Grid36Builder {
        Grid36Builder::new()
    }

    /// Australian Albers over the Australian domain, exact inverse with linear fallback.
    pub fn australia() -> Result<Self, Grid36Error> {
        let projection = StrategyProjection::new(
            AlbersParams::AUSTRALIAN_ALBERS,
            InverseStrategy::ExactWithLinearFallback,
        )?;
        Ok(Self::from_strategy(projection, DomainBounds::AUSTRALIA))
    }

    /// Index whose reference tile sits at the projection's false origin.
    pub fn from_strategy(projection: StrategyProjection, domain: DomainBounds) -> Self {
        let params = projection.params();
        let anchor = PlanarPoint::new(params.false_easting, params.false_northing);
        Self::with_projection(projection, domain).with_reference_anchor(anchor)
    }
}

impl<P: Projection> Grid36<P> {
    /// Index over `domain` using any projection.
    ///
    /// The reference tile defaults to the cell at planar (0, 0).
    pub fn with_projection(projection: P, domain: DomainBounds) -> Self {
        Self {
            projection,
            domain,
            refinement: RefinementPolicy::default(),
            reference_anchor: PlanarPoint::new(0.0, 0.0),
        }
    }

    /// Moves the reference tile to the cell holding `anchor`.
    pub fn with_reference_anchor(mut self, anchor: PlanarPoint) -> Self {
        self.reference_anchor = anchor;
        self
    }

    pub fn with_refinement(mut self, refinement: RefinementPolicy) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn domain(&self) -> &DomainBounds {
        &self.domain
    }

    pub fn refinement(&self) -> RefinementPolicy {
        self.refinement
    }

    /// Projects longitude/latitude onto the plane.
    pub fn project_to_plane(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<PlanarPoint, Grid36Error> {
        self.projection.to_plane(&GeoPoint::new(longitude, latitude))
    }

    /// Encodes a longitude/latitude coordinate at `depth`.
    ///
    /// # Errors
    ///
    /// - [`Grid36Error::InvalidDepth`] - `depth` is outside 1-9
    /// - [`Grid36Error::Conversion`] - the coordinate is not finite or cannot be projected
    pub fn encode(&self, coord: &impl Coordinate, depth: u8) -> Result<TileRecord, Grid36Error> {
        validate_depth(depth)?;
        let planar = self.project_to_plane(coord.x(), coord.y())?;
        self.encode_planar(&planar, depth)
    }

    /// Encodes an already-projected point at `depth`.
    ///
    /// Points outside the domain are clamped to the nearest edge tile and the
    /// record is flagged with `outside_domain`.
    pub fn encode_planar(
        &self,
        planar: &PlanarPoint,
        depth: u8,
    ) -> Result<TileRecord, Grid36Error> {
        validate_depth(depth)?;
        let (i, j, outside) = planar_to_cell(&self.domain, planar)?;
        if outside {
            warn!(
                easting = planar.easting,
                northing = planar.northing,
                "point outside domain, clamped to edge tile"
            );
        }

        let id = generate_tile_identifier(i, j, depth)?;
        // Derive geometry from the ID itself so encode and decode cannot disagree.
        let tile = decode_tile_identifier(&id)?;
        let mut record = TileRecord::from_index(id, &tile, &self.domain, &self.projection)?;
        record.outside_domain = outside;

        debug!(id = %record.id, depth, outside, "encoded tile");
        Ok(record)
    }

    /// Encodes many points in parallel. Each result is independent.
    pub fn encode_many(
        &self,
        points: &[GeoPoint],
        depth: u8,
    ) -> Vec<Result<TileRecord, Grid36Error>> {
        points.par_iter().map(|p| self.encode(p, depth)).collect()
    }

    /// Decodes a tile ID back to its geometry.
    ///
    /// # Errors
    ///
    /// - [`Grid36Error::InvalidTileId`] - empty, longer than 9, or unknown symbols
    pub fn decode(&self, id: &str) -> Result<TileRecord, Grid36Error> {
        if id == RESERVED_ID {
            return self.reference_tile();
        }
        let canonical = normalize_tile_identifier(id)?;
        let tile = decode_tile_identifier(&canonical)?;
        let record = TileRecord::from_index(canonical, &tile, &self.domain, &self.projection)?;
        debug!(id = %record.id, depth = record.depth, "decoded tile");
        Ok(record)
    }

    /// Changes the precision of `id`.
    ///
    /// Coarsening truncates and is exact. Refining follows the configured
    /// [`RefinementPolicy`]; with the default centroid policy the result is the
    /// child tile holding the parent's centroid, one of many possible children.
    /// The lower-left policy appends `0` symbols, except where that would spell
    /// [`RESERVED_ID`]; that one tile refines through its centroid instead.
    ///
    /// # Errors
    ///
    /// - [`Grid36Error::InvalidDepth`] - `new_depth` is outside 1-9
    /// - [`Grid36Error::InvalidTileId`] - `id` is malformed
    pub fn adjust_depth(&self, id: &str, new_depth: u8) -> Result<String, Grid36Error> {
        let new_depth = validate_depth(new_depth)?;
        let canonical = normalize_tile_identifier(id)?;
        let depth = canonical.len();
        let target = new_depth as usize;

        if target <= depth {
            return Ok(canonical[..target].to_string());
        }

        match self.refinement {
            RefinementPolicy::Centroid => refine_through_centroid(&canonical, new_depth),
            RefinementPolicy::LowerLeftChild => {
                let padded = pad_id(&canonical, target);
                if padded != RESERVED_ID {
                    return Ok(padded);
                }
                debug!(id = %canonical, "lower-left child is reserved, using centroid child");
                refine_through_centroid(&canonical, new_depth)
            }
        }
    }

    /// The ID of the tile one level up.
    pub fn parent(&self, id: &str) -> Result<String, Grid36Error> {
        let canonical = normalize_tile_identifier(id)?;
        if canonical.len() == 1 {
            return Err(Grid36Error::invalid_id(&canonical, "no parent above depth 1"));
        }
        Ok(canonical[..canonical.len() - 1].to_string())
    }

    /// The 36 child IDs, in symbol-grid reading order (top row first).
    ///
    /// The lower-left child of `00000000` is left out: its ID is reserved.
    pub fn children(&self, id: &str) -> Result<Vec<String>, Grid36Error> {
        let canonical = normalize_tile_identifier(id)?;
        if canonical.len() >= MAX_DEPTH as usize {
            return Err(Grid36Error::invalid_id(&canonical, "no children below depth 9"));
        }
        Ok(SYMBOL_GRID
            .iter()
            .flatten()
            .map(|symbol| format!("{}{}", canonical, symbol))
            .filter(|child| child != RESERVED_ID)
            .collect())
    }

    /// Same-depth tiles sharing an edge or corner with `id`, clipped to the domain.
    ///
    /// Ordered top-left to bottom-right, skipping the tile itself. The
    /// domain-corner cell is skipped too since its ID names the reference tile,
    /// and the reference tile itself has no grid neighbours.
    pub fn neighbors(&self, id: &str) -> Result<Vec<String>, Grid36Error> {
        let canonical = normalize_tile_identifier(id)?;
        if canonical == RESERVED_ID {
            return Err(Grid36Error::invalid_id(
                &canonical,
                "reference tile has no grid neighbours",
            ));
        }
        let tile = decode_tile_identifier(&canonical)?;

        let mut ids = Vec::with_capacity(8);
        for dr in [1, 0, -1] {
            for dc in [-1, 0, 1] {
                if dc == 0 && dr == 0 {
                    continue;
                }
                if let Some(n) = tile.offset(dc, dr) {
                    let neighbour = tile_index_to_identifier(&n)?;
                    if neighbour != RESERVED_ID {
                        ids.push(neighbour);
                    }
                }
            }
        }
        Ok(ids)
    }

    /// Tile index of the depth-`depth` tile containing a planar point.
    pub fn tile_index_at(&self, planar: &PlanarPoint, depth: u8) -> Result<TileIndex, Grid36Error> {
        validate_depth(depth)?;
        let (i, j, _) = planar_to_cell(&self.domain, planar)?;
        Ok(TileIndex::from_full_resolution(i, j, depth))
    }

    /// The fixed tile behind the reserved all-zero ID.
    pub fn reference_tile(&self) -> Result<TileRecord, Grid36Error> {
        TileRecord::reference(&self.domain, &self.reference_anchor, &self.projection)
    }

    pub(crate) fn record_for_index(&self, tile: &TileIndex) -> Result<TileRecord, Grid36Error> {
        let id = tile_index_to_identifier(tile)?;
        TileRecord::from_index(id, tile, &self.domain, &self.projection)
    }
}

/// Child of `id` at `new_depth` holding the centroid cell of `id`.
///
/// Integer arithmetic on the tile index: the centroid cell lies inside the
/// tile, so the result always extends `id`. It is never [`RESERVED_ID`]
/// either, as the centroid offset of any tile above depth 9 is non-zero.
fn refine_through_centroid(id: &str, new_depth: u8) -> Result<String, Grid36Error> {
    let tile = decode_tile_identifier(id)?;
    let (ci, cj) = tile.centroid_cell();
    generate_tile_identifier(ci, cj, new_depth)
}

fn pad_id(id: &str, target: usize) -> String {
    let mut padded = id.to_string();
    while padded.len() < target {
        padded.push(FILLER_SYMBOL);
    }
    padded
}
