use super::{GeoPoint, PlanarPoint, Projection, check_geo, check_planar};
use crate::error::Grid36Error;

const STEP_DEGREES: f64 = 1e-4;

/// First-order approximation of a projection around a fixed anchor.
///
/// Built from the projection's Jacobian at the anchor. Error grows with
/// distance from the anchor, so it is only a cheap fallback for points near
/// the reference region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearApprox {
    anchor_geo: GeoPoint,
    anchor_plane: PlanarPoint,
    // Row-major [[dx/dlon, dx/dlat], [dy/dlon, dy/dlat]] in meters per degree
    jacobian: [[f64; 2]; 2],
    inverse: [[f64; 2]; 2],
}

impl LinearApprox {
    /// Linearises `projection` at `anchor`, usually the false origin.
    pub fn from_projection<P: Projection + ?Sized>(
        projection: &P,
        anchor: GeoPoint,
    ) -> Result<Self, Grid36Error> {
        let anchor_plane = projection.to_plane(&anchor)?;

        let east = projection.to_plane(&GeoPoint::new(
            anchor.longitude + STEP_DEGREES,
            anchor.latitude,
        ))?;
        let west = projection.to_plane(&GeoPoint::new(
            anchor.longitude - STEP_DEGREES,
            anchor.latitude,
        ))?;
        let north = projection.to_plane(&GeoPoint::new(
            anchor.longitude,
            anchor.latitude + STEP_DEGREES,
        ))?;
        let south = projection.to_plane(&GeoPoint::new(
            anchor.longitude,
            anchor.latitude - STEP_DEGREES,
        ))?;

        let span = 2.0 * STEP_DEGREES;
        let jacobian = [
            [
                (east.easting - west.easting) / span,
                (north.easting - south.easting) / span,
            ],
            [
                (east.northing - west.northing) / span,
                (north.northing - south.northing) / span,
            ],
        ];

        let det = jacobian[0][0] * jacobian[1][1] - jacobian[0][1] * jacobian[1][0];
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(Grid36Error::conversion(
                anchor.longitude,
                anchor.latitude,
                "projection is degenerate at the linearisation anchor",
            ));
        }
        let inverse = [
            [jacobian[1][1] / det, -jacobian[0][1] / det],
            [-jacobian[1][0] / det, jacobian[0][0] / det],
        ];

        Ok(Self {
            anchor_geo: anchor,
            anchor_plane,
            jacobian,
            inverse,
        })
    }

    pub fn anchor(&self) -> GeoPoint {
        self.anchor_geo
    }

    /// Meters per degree of longitude and latitude at the anchor.
    pub fn scale(&self) -> (f64, f64) {
        (self.jacobian[0][0], self.jacobian[1][1])
    }
}

impl Projection for LinearApprox {
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
        check_geo(geo)?;
        let dlon = geo.longitude - self.anchor_geo.longitude;
        let dlat = geo.latitude - self.anchor_geo.latitude;
        Ok(PlanarPoint::new(
            self.anchor_plane.easting + self.jacobian[0][0] * dlon + self.jacobian[0][1] * dlat,
            self.anchor_plane.northing + self.jacobian[1][0] * dlon + self.jacobian[1][1] * dlat,
        ))
    }

    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
        check_planar(planar)?;
        let dx = planar.easting - self.anchor_plane.easting;
        let dy = planar.northing - self.anchor_plane.northing;
        Ok(GeoPoint::new(
            self.anchor_geo.longitude + self.inverse[0][0] * dx + self.inverse[0][1] * dy,
            self.anchor_geo.latitude + self.inverse[1][0] * dx + self.inverse[1][1] * dy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{AlbersEqualArea, AlbersParams};
    use approx::assert_abs_diff_eq;

    fn linear() -> Result<(LinearApprox, AlbersEqualArea), Grid36Error> {
        let albers = AlbersEqualArea::new(AlbersParams::AUSTRALIAN_ALBERS)?;
        let approx = LinearApprox::from_projection(&albers, albers.params().false_origin())?;
        Ok((approx, albers))
    }

    #[test]
    fn test_anchor_is_exact() -> Result<(), Grid36Error> {
        let (approx, _) = linear()?;
        let geo = approx.to_geo(&PlanarPoint::new(0.0, 0.0))?;
        assert_abs_diff_eq!(geo.longitude, 132.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geo.latitude, 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_close_to_exact_near_anchor() -> Result<(), Grid36Error> {
        let (approx, albers) = linear()?;
        let planar = albers.to_plane(&GeoPoint::new(132.05, 0.05))?;
        let geo = approx.to_geo(&planar)?;
        assert_abs_diff_eq!(geo.longitude, 132.05, epsilon = 1e-3);
        assert_abs_diff_eq!(geo.latitude, 0.05, epsilon = 1e-3);
        Ok(())
    }

    #[test]
    fn test_drifts_far_from_anchor() -> Result<(), Grid36Error> {
        let (approx, albers) = linear()?;
        let planar = albers.to_plane(&GeoPoint::new(149.13, -35.28))?;
        let geo = approx.to_geo(&planar)?;
        let error = (geo.longitude - 149.13).abs() + (geo.latitude + 35.28).abs();
        assert!(error > 0.01, "linear inverse should drift, got {}", error);
        Ok(())
    }

    #[test]
    fn test_forward_and_inverse_are_consistent() -> Result<(), Grid36Error> {
        let (approx, _) = linear()?;
        let geo = GeoPoint::new(140.0, -20.0);
        let back = approx.to_geo(&approx.to_plane(&geo)?)?;
        assert_abs_diff_eq!(back.longitude, 140.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back.latitude, -20.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_scale_is_roughly_a_degree() -> Result<(), Grid36Error> {
        let (approx, _) = linear()?;
        let (per_lon, per_lat) = approx.scale();
        assert!(per_lon > 100_000.0 && per_lon < 130_000.0);
        assert!(per_lat > 100_000.0 && per_lat < 130_000.0);
        Ok(())
    }
}
