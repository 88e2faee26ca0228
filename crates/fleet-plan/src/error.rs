//! Planning-subsystem error type.

use thiserror::Error;

use fleet_core::CellId;

/// Errors produced by `fleet-plan`.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The search exhausted its frontier or hit the depth bound without
    /// reaching the goal.  Not fatal for queued jobs — the allocator
    /// retries next tick.
    #[error("no path from {from} to {to}")]
    NoPath { from: CellId, to: CellId },
}

pub type PlanResult<T> = Result<T, PlanError>;
