//! `fleet-plan` — collision-aware trajectory planning.
//!
//! # Crate layout
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`reservations`] | `ReservationTable`: `(cell, time) → robot` ownership |
//! | [`astar`]        | `Planner` trait, `SpaceTimeAstar`, `Trajectory`      |
//! | [`commands`]     | path → motion-command translation, `PlanStep`        |
//! | [`error`]        | `PlanError`, `PlanResult<T>`                         |
//!
//! The planner searches over `(cell, time)` pairs: each step of a
//! trajectory advances time by exactly one second, and a robot may revisit
//! the cell it stands on (a wait step).  The reservation table is the
//! shared ground truth that keeps two robots from claiming the same cell
//! at the same second.

pub mod astar;
pub mod commands;
pub mod error;
pub mod reservations;

#[cfg(test)]
mod tests;

pub use astar::{Planner, SpaceTimeAstar, Trajectory};
pub use commands::{build_plan, translate, turn_between, PlanStep};
pub use error::{PlanError, PlanResult};
pub use reservations::ReservationTable;
