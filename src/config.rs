use crate::coord::{AlbersParams, InverseStrategy, StrategyProjection};
use crate::error::Grid36Error;
use crate::grid::Grid36;
use crate::index::DomainBounds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How `adjust_depth` picks a child when refining an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefinementPolicy {
    /// The child holding the parent's centroid.
    #[default]
    Centroid,
    /// Always the lower-left child, i.e. the lexicographically smallest ID.
    LowerLeftChild,
}

/// Serializable settings for a [`Grid36`] index.
///
/// Missing fields fall back to the Australian defaults.
///
/// # Example
/// ```
/// use grid36_rs::{Grid36Config, RefinementPolicy};
///
/// # fn main() -> Result<(), grid36_rs::Grid36Error> {
/// let config = Grid36Config::from_json_str(r#"{"refinement": "LowerLeftChild"}"#)?;
/// assert_eq!(config.refinement, RefinementPolicy::LowerLeftChild);
/// let grid = config.build()?;
/// assert_eq!(grid.adjust_depth("K", 3)?, "K00");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid36Config {
    pub projection: AlbersParams,
    pub domain: DomainBounds,
    pub inverse_strategy: InverseStrategy,
    pub refinement: RefinementPolicy,
}

impl Grid36Config {
    pub fn from_json_str(s: &str) -> Result<Self, Grid36Error> {
        serde_json::from_str(s).map_err(|e| Grid36Error::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Grid36Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Grid36Error::Io(e.to_string()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, Grid36Error> {
        serde_json::to_string_pretty(self).map_err(|e| Grid36Error::Config(e.to_string()))
    }

    pub fn build(&self) -> Result<Grid36, Grid36Error> {
        let projection = StrategyProjection::new(self.projection, self.inverse_strategy)?;
        Ok(Grid36::from_strategy(projection, self.domain).with_refinement(self.refinement))
    }
}

/// Fluent construction of a [`Grid36`]. Unset values use the defaults.
#[derive(Debug, Default)]
pub struct Grid36Builder {
    projection: Option<AlbersParams>,
    domain: Option<DomainBounds>,
    inverse_strategy: Option<InverseStrategy>,
    refinement: Option<RefinementPolicy>,
}

impl Grid36Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(mut self, params: AlbersParams) -> Self {
        self.projection = Some(params);
        self
    }

    pub fn domain(mut self, domain: DomainBounds) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets the domain from raw bounds, rejecting non-square extents.
    pub fn extent(
        self,
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    ) -> Result<Self, Grid36Error> {
        Ok(self.domain(DomainBounds::new(x_min, y_min, x_max, y_max)?))
    }

    pub fn inverse_strategy(mut self, strategy: InverseStrategy) -> Self {
        self.inverse_strategy = Some(strategy);
        self
    }

    pub fn refinement(mut self, policy: RefinementPolicy) -> Self {
        self.refinement = Some(policy);
        self
    }

    pub fn build(self) -> Result<Grid36, Grid36Error> {
        Grid36Config {
            projection: self.projection.unwrap_or_default(),
            domain: self.domain.unwrap_or_default(),
            inverse_strategy: self.inverse_strategy.unwrap_or_default(),
            refinement: self.refinement.unwrap_or_default(),
        }
        .build()
    }
}
