mod albers;
mod fallback;
mod linear;
#[cfg(feature = "proj")]
mod proj_backend;

pub use albers::{AlbersEqualArea, AlbersParams};
pub use fallback::{FallbackProjection, InverseStrategy, StrategyProjection};
pub use linear::LinearApprox;
#[cfg(feature = "proj")]
pub use proj_backend::ProjAlbers;

use crate::error::Grid36Error;
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>`, [`GeoPoint`]
/// and [`PlanarPoint`]. This allows functions to accept any of them.
pub trait Coordinate {
    /// Returns the x-coordinate (easting or longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (northing or latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

/// Coordinate reference system of raw input coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Crs {
    /// Longitude/latitude in degrees.
    #[default]
    Wgs84,
    /// Easting/northing in the projected plane, meters.
    Planar,
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl Coordinate for GeoPoint {
    fn x(&self) -> f64 {
        self.longitude
    }
    fn y(&self) -> f64 {
        self.latitude
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.longitude, p.latitude)
    }
}

/// A position in the projected plane, meters.
///
/// May lie outside the tile domain; encoding flags that rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub easting: f64,
    pub northing: f64,
}

impl PlanarPoint {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    pub fn is_finite(&self) -> bool {
        self.easting.is_finite() && self.northing.is_finite()
    }
}

impl Coordinate for PlanarPoint {
    fn x(&self) -> f64 {
        self.easting
    }
    fn y(&self) -> f64 {
        self.northing
    }
}

impl From<PlanarPoint> for Point<f64> {
    fn from(p: PlanarPoint) -> Self {
        Point::new(p.easting, p.northing)
    }
}

/// A map projection between geographic and planar coordinates.
///
/// Implementations must report non-finite input or output as
/// [`Grid36Error::Conversion`] instead of returning NaN or infinity.
pub trait Projection: Send + Sync {
    /// Projects a geographic point onto the plane.
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error>;
    /// Recovers the geographic point for a planar position.
    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error>;
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
        (**self).to_plane(geo)
    }
    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
        (**self).to_geo(planar)
    }
}

pub(crate) fn check_geo(geo: &GeoPoint) -> Result<(), Grid36Error> {
    if geo.is_finite() {
        Ok(())
    } else {
        Err(Grid36Error::conversion(
            geo.longitude,
            geo.latitude,
            "non-finite geographic input",
        ))
    }
}

pub(crate) fn check_planar(planar: &PlanarPoint) -> Result<(), Grid36Error> {
    if planar.is_finite() {
        Ok(())
    } else {
        Err(Grid36Error::conversion(
            planar.easting,
            planar.northing,
            "non-finite planar input",
        ))
    }
}
