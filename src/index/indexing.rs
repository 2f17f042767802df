use crate::coord::{PlanarPoint, check_planar};
use crate::error::Grid36Error;
use crate::index::constants::{FULL_RESOLUTION, MAX_DEPTH, MIN_DEPTH, SUBDIVISION, tile_scale};
use crate::index::domain::DomainBounds;

/// Position of a tile in the grid of its own depth.
///
/// `col` and `row` run from 0 to `6^depth - 1`, with (0, 0) at the lower-left
/// corner of the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub col: i64,
    pub row: i64,
    pub depth: u8,
}

impl TileIndex {
    pub fn new(col: i64, row: i64, depth: u8) -> Result<Self, Grid36Error> {
        validate_depth(depth)?;
        let count = tiles_per_axis(depth);
        if !(0..count).contains(&col) || !(0..count).contains(&row) {
            return Err(Grid36Error::InvalidExtent(format!(
                "tile ({}, {}) is outside the depth {} grid",
                col, row, depth
            )));
        }
        Ok(Self { col, row, depth })
    }

    /// Tile containing the full-resolution cell `(i, j)`.
    pub(crate) fn from_full_resolution(i: i64, j: i64, depth: u8) -> Self {
        let scale = tile_scale(depth);
        Self {
            col: i / scale,
            row: j / scale,
            depth,
        }
    }

    /// Side length in full-resolution units.
    pub fn scale(&self) -> i64 {
        tile_scale(self.depth)
    }

    /// Lower-left full-resolution cell of this tile.
    pub fn origin(&self) -> (i64, i64) {
        let scale = self.scale();
        (self.col * scale, self.row * scale)
    }

    /// Full-resolution cell holding the centroid: origin plus half the side, rounded down.
    pub fn centroid_cell(&self) -> (i64, i64) {
        let (i0, j0) = self.origin();
        let half = self.scale() / 2;
        (i0 + half, j0 + half)
    }

    pub fn parent(&self) -> Option<Self> {
        (self.depth > MIN_DEPTH).then(|| Self {
            col: self.col / SUBDIVISION,
            row: self.row / SUBDIVISION,
            depth: self.depth - 1,
        })
    }

    /// Child at local digit position `(di, dj)`, each in 0-5.
    pub fn child(&self, di: i64, dj: i64) -> Option<Self> {
        if self.depth >= MAX_DEPTH
            || !(0..SUBDIVISION).contains(&di)
            || !(0..SUBDIVISION).contains(&dj)
        {
            return None;
        }
        Some(Self {
            col: self.col * SUBDIVISION + di,
            row: self.row * SUBDIVISION + dj,
            depth: self.depth + 1,
        })
    }

    /// Same-depth tile shifted by `(dc, dr)`, or `None` if it leaves the domain.
    pub fn offset(&self, dc: i64, dr: i64) -> Option<Self> {
        Self::new(self.col + dc, self.row + dr, self.depth).ok()
    }
}

pub fn validate_depth(depth: u8) -> Result<u8, Grid36Error> {
    if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(Grid36Error::InvalidDepth(depth))
    }
}

/// Number of tiles along one axis at `depth`.
pub fn tiles_per_axis(depth: u8) -> i64 {
    FULL_RESOLUTION / tile_scale(depth)
}

/// Full-resolution cell containing `p`, clamped into the domain.
///
/// Returns `(i, j, outside_domain)`. Points outside the domain, including
/// points exactly on the upper edges, snap to the nearest edge cell.
pub fn planar_to_cell(
    domain: &DomainBounds,
    p: &PlanarPoint,
) -> Result<(i64, i64, bool), Grid36Error> {
    check_planar(p)?;

    let outside = !domain.contains(p);
    let unit = domain.unit();
    let eps = unit * 1e-6;

    let x = p.easting.clamp(domain.x_min(), domain.x_max() - eps);
    let y = p.northing.clamp(domain.y_min(), domain.y_max() - eps);

    let i = (((x - domain.x_min()) / unit).floor() as i64).clamp(0, FULL_RESOLUTION - 1);
    let j = (((y - domain.y_min()) / unit).floor() as i64).clamp(0, FULL_RESOLUTION - 1);

    Ok((i, j, outside))
}

/// Planar position of the lower-left corner of full-resolution cell `(i, j)`.
pub fn cell_to_planar(domain: &DomainBounds, i: i64, j: i64) -> PlanarPoint {
    let unit = domain.unit();
    PlanarPoint::new(
        domain.x_min() + i as f64 * unit,
        domain.y_min() + j as f64 * unit,
    )
}
