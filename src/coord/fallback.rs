use super::{AlbersEqualArea, AlbersParams, GeoPoint, LinearApprox, PlanarPoint, Projection};
use crate::error::Grid36Error;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A primary projection with a secondary used when the primary inverse fails.
///
/// The forward direction always uses the primary. The inverse tries the
/// primary first and only consults the secondary if it returns an error, so
/// the result carries the accuracy of whichever strategy answered.
#[derive(Debug, Clone)]
pub struct FallbackProjection<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Projection, S: Projection> FallbackProjection<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<P: Projection, S: Projection> Projection for FallbackProjection<P, S> {
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
        self.primary.to_plane(geo)
    }

    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
        match self.primary.to_geo(planar) {
            Ok(geo) => Ok(geo),
            Err(err) => {
                warn!(
                    easting = planar.easting,
                    northing = planar.northing,
                    error = %err,
                    "exact inverse failed, using secondary projection"
                );
                self.secondary.to_geo(planar)
            }
        }
    }
}

/// Which inverse projection answers planar → geographic queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InverseStrategy {
    /// Exact ellipsoidal inverse only; failures surface as errors.
    Exact,
    /// Linear approximation around the false origin only.
    Linear,
    /// Exact inverse, falling back to the linear approximation on failure.
    #[default]
    ExactWithLinearFallback,
}

/// Albers projection whose inverse follows an [`InverseStrategy`].
#[derive(Debug, Clone)]
pub struct StrategyProjection {
    inner: FallbackProjection<AlbersEqualArea, LinearApprox>,
    strategy: InverseStrategy,
}

impl StrategyProjection {
    pub fn new(params: AlbersParams, strategy: InverseStrategy) -> Result<Self, Grid36Error> {
        let albers = AlbersEqualArea::new(params)?;
        let linear = LinearApprox::from_projection(&albers, params.false_origin())?;
        Ok(Self {
            inner: FallbackProjection::new(albers, linear),
            strategy,
        })
    }

    pub fn strategy(&self) -> InverseStrategy {
        self.strategy
    }

    pub fn params(&self) -> &AlbersParams {
        self.inner.primary().params()
    }
}

impl Projection for StrategyProjection {
    fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
        self.inner.to_plane(geo)
    }

    fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
        match self.strategy {
            InverseStrategy::Exact => self.inner.primary().to_geo(planar),
            InverseStrategy::Linear => self.inner.secondary().to_geo(planar),
            InverseStrategy::ExactWithLinearFallback => self.inner.to_geo(planar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct AlwaysFails;

    impl Projection for AlwaysFails {
        fn to_plane(&self, geo: &GeoPoint) -> Result<PlanarPoint, Grid36Error> {
            Err(Grid36Error::conversion(geo.longitude, geo.latitude, "always fails"))
        }
        fn to_geo(&self, planar: &PlanarPoint) -> Result<GeoPoint, Grid36Error> {
            Err(Grid36Error::conversion(planar.easting, planar.northing, "always fails"))
        }
    }

    #[test]
    fn test_secondary_answers_when_primary_fails() -> Result<(), Grid36Error> {
        let albers = AlbersEqualArea::new(AlbersParams::AUSTRALIAN_ALBERS)?;
        let chain = FallbackProjection::new(AlwaysFails, albers);

        let geo = chain.to_geo(&PlanarPoint::new(0.0, 0.0))?;
        assert_abs_diff_eq!(geo.longitude, 132.0, epsilon = 1e-9);

        // forward never consults the secondary
        assert!(chain.to_plane(&GeoPoint::new(132.0, 0.0)).is_err());
        Ok(())
    }

    #[test]
    fn test_strategies_agree_at_false_origin() -> Result<(), Grid36Error> {
        for strategy in [
            InverseStrategy::Exact,
            InverseStrategy::Linear,
            InverseStrategy::ExactWithLinearFallback,
        ] {
            let proj = StrategyProjection::new(AlbersParams::AUSTRALIAN_ALBERS, strategy)?;
            let geo = proj.to_geo(&PlanarPoint::new(0.0, 0.0))?;
            assert_abs_diff_eq!(geo.longitude, 132.0, epsilon = 1e-9);
            assert_abs_diff_eq!(geo.latitude, 0.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_exact_strategy_surfaces_errors() -> Result<(), Grid36Error> {
        let far = PlanarPoint::new(0.0, -1.0e9);

        let exact =
            StrategyProjection::new(AlbersParams::AUSTRALIAN_ALBERS, InverseStrategy::Exact)?;
        assert!(exact.to_geo(&far).is_err());

        let fallback = StrategyProjection::new(
            AlbersParams::AUSTRALIAN_ALBERS,
            InverseStrategy::ExactWithLinearFallback,
        )?;
        assert!(fallback.to_geo(&far)?.is_finite());
        Ok(())
    }
}
