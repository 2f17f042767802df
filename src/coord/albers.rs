use super::{GeoPoint, PlanarPoint, Projection, check_geo, check_planar};
use crate::error::Grid36Error;
use serde::{Deserialize, Serialize};

const MAX_INVERSE_ITERATIONS: usize = 25;
const INVERSE_TOLERANCE: f64 = 1e-12;

/// Defining parameters of an Albers Equal-Area Conic projection on an ellipsoid.
///
/// Angles are in degrees, distances in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlbersParams {
    /// Latitude of false origin
    pub lat_origin: f64,
    /// Longitude of false origin
    pub lon_origin: f64,
    /// First standard parallel
    pub standard_parallel_1: f64,
    /// Second standard parallel
    pub standard_parallel_2: f64,
    /// Easting at false origin
    pub false_easting: f64,
    /// Northing at false origin
    pub false_northing: f64,
    /// Ellipsoid semi-major axis
    pub semi_major_axis: f64,
    /// Ellipsoid inverse flattening
    pub inverse_flattening: f64,
}

impl AlbersParams {
    /// GDA94 / Australian Albers (EPSG:3577) on the GRS80 ellipsoid.
    pub const AUSTRALIAN_ALBERS: AlbersParams = AlbersParams {
        lat_origin: 0.0,
        lon_origin: 132.0,
        standard_parallel_1: -18.0,
        standard_parallel_2: -36.0,
        false_easting: 0.0,
        false_northing: 0.0,
        semi_major_axis: 6378137.0,
        inverse_flattening: 298.257222101,
    };

    /// The geographic position of the false origin.
    pub fn false_origin(&self) -> GeoPoint {
        GeoPoint::new(self.lon_origin, self.lat_origin)
    }

    /// PROJ definition string for these parameters.
    pub fn to_proj_string(&self) -> String {
        format!(
            concat!(
                "+proj=aea +lat_0={} +lon_0={} +lat_1={} +lat_2={} ",
                "+x_0={} +y_0={} +a={} +rf={} +units=m +no_defs +type=crs",
            ),
            self.lat_origin,
            self.lon_origin,
            self.standard_parallel_1,
            self.standard_parallel_2,
            self.false_easting,
            self.false_northing,
            self.semi_major_axis,
            self.inverse_flattening,
        )
    }
}

impl Default for AlbersParams {
    fn default() -> Self {
        Self::AUSTRALIAN_ALBERS
    }
}

/// Ellipsoidal Albers Equal-Area Conic projection.
///
/// Forward uses the closed-form equations; the inverse iterates on latitude
/// until the correction drops below 1e-12 radians.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbersEqualArea {
    params: AlbersParams,
    a: f64,
    e2: f64,
    e: f64,
    n: f64,
    c: f64,
    rho0: f64,
    q_pole: f64,
}

impl AlbersEqualArea {
    pub fn new(params: AlbersParams) -> Result<Self, Grid36Error> {
        let values = [
            params.lat_origin,
            params.lon_origin,
            params.standard_parallel_1,
            params.standard_parallel_2,
            params.false_easting,
            params.false_northing,
            params.semi_major_axis,
            params.inverse_flattening,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Grid36Error::Config(
                "Albers parameters must be finite".to_string(),
            ));
        }
        if params.semi_major_axis <= 0.0 || params.inverse_flattening <= 1.0 {
            return Err(Grid36Error::Config(
                "Ellipsoid axis and inverse flattening must be positive".to_string(),
            ));
        }

        let a = params.semi_major_axis;
        let f = 1.0 / params.inverse_flattening;
        let e2 = 2.0 * f - f * f;
        let e = e2.sqrt();

        let phi1 = params.standard_parallel_1.to_radians();
        let phi2 = params.standard_parallel_2.to_radians();
        let phi0 = params.lat_origin.to_radians();

        let m1 = m(phi1, e2);
        let m2 = m(phi2, e2);
        let q1 = q(phi1, e, e2);
        let q2 = q(phi2, e, e2);
        let q0 = q(phi0, e, e2);

        let n = if (phi1 - phi2).abs() < 1e-10 {
            phi1.sin()
        } else {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        };
        if !n.is_finite() || n.abs() < 1e-10 {
            return Err(Grid36Error::Config(
                "Standard parallels must not be symmetric about the equator".to_string(),
            ));
        }

        let c = m1 * m1 + n * q1;
        let rho0 = a * (c - n * q0).sqrt() / n;
        if !rho0.is_finite() {
            return Err(Grid36Error::Config(
                "Latitude of false origin is outside the projection's range".to_string(),
            ));
        }

        Ok(Self {
            params,
            a,
            e2,
            e,
            n,
            c,
            rho0,
            q_pole: q(std::f64::consts::FRAC_PI_2, e, e2),
        })
    }

    pub fn params(&self) -> &AlbersParams {
        &self.params
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn rho(&self, phi: f64) -> f64 {
        self.a * (self.c - self.n * q(phi, self.e, self.e2)).sqrt() / self.n
    }

    fn latitude_from_q(&self, q_value: f64) -> Option<f64> {
        if (q_value.abs() - self.q_pole.abs()).abs() < 1e-12 {
            return Some(std::f64::consts::FRAC_PI_2.copysign(q_value));
        }

        let mut phi = (q_value / 2.0).clamp(-1.0, 1.0).asin();
        for _ in 0..MAX_INVERSE_ITERATIONS {
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();
            let one_minus = 1.0 - self.e2 * sin_phi * sin_phi;
            let delta = one_minus * one_minus / (2.0 * cos_phi)
                * (q_value / (1.0 - self.e2) - sin_phi / one_minus
                    + (1.0 / (2.0 * self.e))
                        * ((1.0 - self.e * sin_phi) / (1.0 + self.e * sin_phi)).ln());
            phi += delta;
            if !phi.is_finite() {
                return None;
            }
            if delta.abs() < INVERSE_TOLERANCE {
                return Some(phi);
            }
        }
        None
    }
}

impl Projection for AlbersEqualArea {
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
        check_geo(geo)?;

        let rho = self.rho(geo.latitude.to_radians());
        let theta = self.n * (geo.longitude - self.params.lon_origin).to_radians();

        let easting = self.params.false_easting + rho * theta.sin();
        let northing = self.params.false_northing + self.rho0 - rho * theta.cos();

        let planar = PlanarPoint::new(easting, northing);
        if !planar.is_finite() {
            return Err(Grid36Error::conversion(
                geo.longitude,
                geo.latitude,
                "projection produced a non-finite result",
            ));
        }
        Ok(planar)
    }

    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
        check_planar(planar)?;

        let x = planar.easting - self.params.false_easting;
        let dy = self.rho0 - (planar.northing - self.params.false_northing);
        let sign = self.n.signum();

        let rho = x.hypot(dy).copysign(self.n);
        let theta = (x * sign).atan2(dy * sign);
        let q_value = (self.c - rho * rho * self.n * self.n / (self.a * self.a)) / self.n;

        if q_value.abs() > self.q_pole.abs() + 1e-12 {
            return Err(Grid36Error::conversion(
                planar.easting,
                planar.northing,
                "point lies outside the projection's valid range",
            ));
        }

        let phi = self.latitude_from_q(q_value).ok_or_else(|| {
            Grid36Error::conversion(
                planar.easting,
                planar.northing,
                "inverse latitude iteration did not converge",
            )
        })?;

        let longitude = wrap_longitude(self.params.lon_origin + (theta / self.n).to_degrees());
        let geo = GeoPoint::new(longitude, phi.to_degrees());
        if !geo.is_finite() {
            return Err(Grid36Error::conversion(
                planar.easting,
                planar.northing,
                "inverse projection produced a non-finite result",
            ));
        }
        Ok(geo)
    }
}

/// Authalic function q(phi).
fn q(phi: f64, e: f64, e2: f64) -> f64 {
    let s = phi.sin();
    (1.0 - e2) * (s / (1.0 - e2 * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

fn m(phi: f64, e2: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e2 * s * s).sqrt()
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn albers() -> AlbersEqualArea {
        AlbersEqualArea::new(AlbersParams::AUSTRALIAN_ALBERS).unwrap()
    }

    #[test]
    fn test_false_origin_maps_to_false_easting_northing() -> Result<(), Grid36Error> {
        let p = albers().to_plane(&GeoPoint::new(132.0, 0.0))?;
        assert_abs_diff_eq!(p.easting, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.northing, 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_canberra_forward() -> Result<(), Grid36Error> {
        let p = albers().to_plane(&GeoPoint::new(149.13, -35.28))?;
        assert_abs_diff_eq!(p.easting, 1550570.619, epsilon = 0.01);
        assert_abs_diff_eq!(p.northing, -3957368.594, epsilon = 0.01);
        Ok(())
    }

    #[test]
    fn test_central_meridian_has_zero_easting() -> Result<(), Grid36Error> {
        let p = albers().to_plane(&GeoPoint::new(132.0, -25.0))?;
        assert_abs_diff_eq!(p.easting, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.northing, -2702570.960, epsilon = 0.01);
        Ok(())
    }

    #[test]
    fn test_roundtrip() -> Result<(), Grid36Error> {
        let proj = albers();
        for (lon, lat) in [
            (149.13, -35.28),
            (151.2093, -33.8688),
            (115.8605, -31.9505),
            (130.8456, -12.4634),
            (147.3272, -42.8821),
        ] {
            let planar = proj.to_plane(&GeoPoint::new(lon, lat))?;
            let back = proj.to_geo(&planar)?;
            assert_abs_diff_eq!(back.longitude, lon, epsilon = 1e-9);
            assert_abs_diff_eq!(back.latitude, lat, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_non_finite_input_is_conversion_error() {
        let proj = albers();
        assert!(matches!(
            proj.to_plane(&GeoPoint::new(f64::NAN, -30.0)),
            Err(Grid36Error::Conversion { .. })
        ));
        assert!(matches!(
            proj.to_geo(&PlanarPoint::new(0.0, f64::NEG_INFINITY)),
            Err(Grid36Error::Conversion { .. })
        ));
    }

    #[test]
    fn test_far_outside_range_is_conversion_error() {
        let result = albers().to_geo(&PlanarPoint::new(0.0, -1.0e9));
        assert!(matches!(result, Err(Grid36Error::Conversion { .. })));
    }

    #[test]
    fn test_symmetric_parallels_rejected() {
        let params = AlbersParams {
            standard_parallel_1: 30.0,
            standard_parallel_2: -30.0,
            ..AlbersParams::AUSTRALIAN_ALBERS
        };
        assert!(matches!(
            AlbersEqualArea::new(params),
            Err(Grid36Error::Config(_))
        ));
    }

    #[test]
    fn test_proj_string() {
        let s = AlbersParams::AUSTRALIAN_ALBERS.to_proj_string();
        assert!(s.starts_with("+proj=aea"));
        assert!(s.contains("+lon_0=132"));
        assert!(s.contains("+lat_1=-18"));
    }

    #[test]
    fn test_wrap_longitude() {
        assert_abs_diff_eq!(wrap_longitude(190.0), -170.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap_longitude(-190.0), 170.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap_longitude(45.0), 45.0, epsilon = 1e-12);
    }
}
