use crate::coord::PlanarPoint;
use crate::error::Grid36Error;
use crate::index::constants::FULL_RESOLUTION;
use geo_types::{Rect, coord};
use serde::{Deserialize, Serialize};

/// The square planar region covered by the tile index.
///
/// The side is split into `6^9` full-resolution cells; `unit()` is the
/// width of one cell in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct DomainBounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

#[derive(Serialize, Deserialize)]
struct RawBounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl TryFrom<RawBounds> for DomainBounds {
    type Error = Grid36Error;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        DomainBounds::new(raw.x_min, raw.y_min, raw.x_max, raw.y_max)
    }
}

impl From<DomainBounds> for RawBounds {
    fn from(d: DomainBounds) -> Self {
        RawBounds {
            x_min: d.x_min,
            y_min: d.y_min,
            x_max: d.x_max,
            y_max: d.y_max,
        }
    }
}

impl DomainBounds {
    /// Australian domain: a 10 077 696 m square, one meter per full-resolution cell.
    pub const AUSTRALIA: DomainBounds = DomainBounds {
        x_min: -5_038_848.0,
        y_min: -8_038_848.0,
        x_max: 5_038_848.0,
        y_max: 2_038_848.0,
    };

    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, Grid36Error> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(Grid36Error::InvalidDomain(
                "bounds must be finite".to_string(),
            ));
        }
        let width = x_max - x_min;
        let height = y_max - y_min;
        if width <= 0.0 || height <= 0.0 {
            return Err(Grid36Error::InvalidDomain(format!(
                "extent must be positive, got {} x {}",
                width, height
            )));
        }
        if (width - height).abs() > 1e-9 * width.max(height) {
            return Err(Grid36Error::InvalidDomain(format!(
                "extent must be square, got {} x {}",
                width, height
            )));
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Square domain of side `unit * 6^9` with its lower-left corner at `(x_min, y_min)`.
    pub fn from_origin(x_min: f64, y_min: f64, unit: f64) -> Result<Self, Grid36Error> {
        let side = unit * FULL_RESOLUTION as f64;
        Self::new(x_min, y_min, x_min + side, y_min + side)
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Side length in meters.
    pub fn side(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Width of one full-resolution cell in meters.
    pub fn unit(&self) -> f64 {
        self.side() / FULL_RESOLUTION as f64
    }

    /// Half-open containment: the upper edges belong to no cell.
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

impl Default for DomainBounds {
    fn default() -> Self {
        Self::AUSTRALIA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_domain() {
        let d = DomainBounds::default();
        assert_eq!(d.side(), 10_077_696.0);
        assert_eq!(d.unit(), 1.0);
        assert_eq!(d.y_max() - d.y_min(), d.side());
    }

    #[test]
    fn test_contains_is_half_open() {
        let d = DomainBounds::AUSTRALIA;
        assert!(d.contains(&PlanarPoint::new(d.x_min(), d.y_min())));
        assert!(!d.contains(&PlanarPoint::new(d.x_max(), 0.0)));
        assert!(!d.contains(&PlanarPoint::new(0.0, d.y_max())));
        assert!(d.contains(&PlanarPoint::new(1550570.6, -3957368.6)));
    }

    #[test]
    fn test_non_square_rejected() {
        let result = DomainBounds::new(0.0, 0.0, 100.0, 50.0);
        assert!(matches!(result, Err(Grid36Error::InvalidDomain(_))));
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        assert!(DomainBounds::new(0.0, 0.0, 0.0, 0.0).is_err());
        assert!(DomainBounds::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_from_origin_scales_unit() -> Result<(), Grid36Error> {
        let d = DomainBounds::from_origin(0.0, 0.0, 10.0)?;
        assert_eq!(d.unit(), 10.0);
        assert_eq!(d.x_max(), 100_776_960.0);
        Ok(())
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<DomainBounds, _> =
            serde_json::from_str(r#"{"x_min":0.0,"y_min":0.0,"x_max":10.0,"y_max":10.0}"#);
        assert!(ok.is_ok());

        let bad: Result<DomainBounds, _> =
            serde_json::from_str(r#"{"x_min":0.0,"y_min":0.0,"x_max":10.0,"y_max":20.0}"#);
        assert!(bad.is_err());
    }
}
