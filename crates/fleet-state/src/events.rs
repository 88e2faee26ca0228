//! Broadcast events.
//!
//! Emitted on every observable state change, while the state lock is held,
//! so any single observer sees events in a consistent order.  Delivery is
//! best-effort: the channel is bounded and slow observers lose the oldest
//! events (they can resynchronize from a state snapshot).

use serde::Serialize;

use fleet_core::RobotId;

use crate::view::{JobView, RobotView};

/// One push notification to observers.
///
/// Serializes as `{"event": "<type>", "data": {...}}`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// A robot's record changed.
    RobotUpdate { robot: RobotId, info: RobotView },
    /// A job's record changed.
    JobUpdate { job: JobView },
}
