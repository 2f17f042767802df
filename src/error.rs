use thiserror::Error;

/// Error type for grid36-rs operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Grid36Error {
    /// Projection received or produced a non-finite coordinate.
    #[error("Conversion error at ({x}, {y}): {reason}")]
    Conversion { x: f64, y: f64, reason: String },
    /// The depth is outside the valid range (1-9).
    #[error("Invalid depth: {0} (expected 1-9)")]
    InvalidDepth(u8),
    /// The tile ID is empty, too long, or contains a symbol outside the alphabet.
    #[error("Invalid tile ID '{id}': {reason}")]
    InvalidTileId { id: String, reason: String },
    /// Domain bounds are not finite, not positive, or not square.
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
    /// An extent cannot be covered with tiles.
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(String),
    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParse(String),
    /// Configuration could not be read or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),
}

impl Grid36Error {
    pub(crate) fn conversion(x: f64, y: f64, reason: impl Into<String>) -> Self {
        Grid36Error::Conversion {
            x,
            y,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_id(id: &str, reason: impl Into<String>) -> Self {
        Grid36Error::InvalidTileId {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
