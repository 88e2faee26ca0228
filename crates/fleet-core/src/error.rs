//! Top-level error type.
//!
//! Sub-crates define their own error enums (`MapError`, `PlanError`) and
//! convert into `FleetError` via `From` impls at the service boundary.  The
//! variants mirror what the transport adapter must distinguish: invalid
//! input and unknown ids surface as 400, the two no-path cases as 500 with
//! their literal messages.

use thiserror::Error;

use crate::ids::{JobId, RobotId};

/// The top-level error type for the fleet planner.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("unknown robot {0}")]
    UnknownRobot(RobotId),

    #[error("unknown job {0}")]
    UnknownJob(JobId),

    #[error("unknown cell {0:?}")]
    UnknownCell(String),

    /// A required request field is missing or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("no path to pickup")]
    NoPathToPickup,

    #[error("no path pickup->drop")]
    NoPathToDrop,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fleet-*` crates.
pub type FleetResult<T> = Result<T, FleetError>;
