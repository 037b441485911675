use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TilingError {
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Invalid tile size: {0}")]
    InvalidTileSize(String),

    #[error("Geometry failure: {0}")]
    GeometryFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}

/// Discriminant of a [`TilingError`], for callers that report errors as
/// structured `{ kind, message }` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidPolygon,
    InvalidTileSize,
    GeometryFailure,
    InvalidConfig,
    GeoJson,
}

impl TilingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TilingError::InvalidPolygon(_) => ErrorKind::InvalidPolygon,
            TilingError::InvalidTileSize(_) => ErrorKind::InvalidTileSize,
            TilingError::GeometryFailure(_) => ErrorKind::GeometryFailure,
            TilingError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            TilingError::GeoJson(_) => ErrorKind::GeoJson,
        }
    }
}

pub type Result<T> = std::result::Result<T, TilingError>;
