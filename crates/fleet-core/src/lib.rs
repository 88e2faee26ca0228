//! `fleet-core` — foundational types for the fleet planner.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It
//! intentionally has no `fleet-*` dependencies and minimal external ones
//! (only `thiserror` and `uuid`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `CellId`, `RobotId`, `JobId`                            |
//! | [`heading`] | `Heading` enum with table-lookup rotations              |
//! | [`command`] | `Command` motion tokens (`S L R U D`)                   |
//! | [`time`]    | `Stamp` (discrete seconds), `Clock` implementations     |
//! | [`config`]  | `PlannerConfig`                                         |
//! | [`error`]   | `FleetError`, `FleetResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.         |

pub mod command;
pub mod config;
pub mod error;
pub mod heading;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use command::Command;
pub use config::PlannerConfig;
pub use error::{FleetError, FleetResult};
pub use heading::Heading;
pub use ids::{CellId, JobId, RobotId};
pub use time::{Clock, ManualClock, Stamp, SystemClock};
