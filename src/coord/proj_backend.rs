use super::{AlbersParams, GeoPoint, PlanarPoint, Projection, check_geo, check_planar};
use crate::error::Grid36Error;
use proj::Proj;

/// Albers projection backed by PROJ.
///
/// `proj::Proj` is not `Sync`, so the definitions are kept and a transformer
/// is created per call, as lightweight callers of PROJ do.
#[derive(Debug, Clone)]
pub struct ProjAlbers {
    definition: String,
}

impl ProjAlbers {
    pub fn new(params: &AlbersParams) -> Result<Self, Grid36Error> {
        let definition = params.to_proj_string();
        Proj::new_known_crs("EPSG:4326", &definition, None)
            .map_err(|e| Grid36Error::Config(e.to_string()))?;
        Ok(Self { definition })
    }
}

impl Projection for ProjAlbers {
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
        check_geo(geo)?;
        let proj = Proj::new_known_crs("EPSG:4326", &self.definition, None)
            .map_err(|e| Grid36Error::conversion(geo.longitude, geo.latitude, e.to_string()))?;
        let (easting, northing) = proj
            .convert((geo.longitude, geo.latitude))
            .map_err(|e| Grid36Error::conversion(geo.longitude, geo.latitude, e.to_string()))?;
        let planar = PlanarPoint::new(easting, northing);
        check_planar(&planar)?;
        Ok(planar)
    }

    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
        check_planar(planar)?;
        let proj = Proj::new_known_crs(&self.definition, "EPSG:4326", None).map_err(|e| {
            Grid36Error::conversion(planar.easting, planar.northing, e.to_string())
        })?;
        let (lon, lat) = proj
            .convert((planar.easting, planar.northing))
            .map_err(|e| Grid36Error::conversion(planar.easting, planar.northing, e.to_string()))?;
        let geo = GeoPoint::new(lon, lat);
        check_geo(&geo)?;
        Ok(geo)
    }
}
