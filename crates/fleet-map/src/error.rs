//! Map-subsystem error type.

use thiserror::Error;

use fleet_core::{FleetError, Heading};

/// Errors produced by `fleet-map`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("unknown cell {0:?}")]
    UnknownCell(String),

    #[error("cell {from:?} already has an out-edge to the {dir}")]
    DuplicateEdge { from: String, dir: Heading },

    #[error("map has no cells")]
    Empty,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MapResult<T> = Result<T, MapError>;

impl From<MapError> for FleetError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::UnknownCell(name) => FleetError::UnknownCell(name),
            MapError::Parse(msg)        => FleetError::Parse(msg),
            MapError::Io(err)           => FleetError::Io(err),
            other                       => FleetError::Config(other.to_string()),
        }
    }
}
