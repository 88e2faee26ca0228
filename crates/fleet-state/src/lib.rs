//! `fleet-state` — the authoritative in-memory fleet state.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`robot`]  | `Robot`, `RobotStatus`                                    |
//! | [`job`]    | `Job`, `JobStatus`, progress trace and execution reports  |
//! | [`store`]  | `FleetStore`: robot/job tables, queue, reservations       |
//! | [`view`]   | serde wire views (`RobotView`, `JobView`)                 |
//! | [`events`] | `Event` — broadcast payloads for observers                |
//!
//! `FleetStore` is a plain data structure with no locking of its own; the
//! service layer wraps it in one coarse mutex and serializes every
//! observable operation through it.  Robots and jobs are kept in insertion
//! order — robot order is the tie-break for allocator selection, job order
//! for queue fairness.

pub mod events;
pub mod job;
pub mod robot;
pub mod store;
pub mod view;

#[cfg(test)]
mod tests;

pub use events::Event;
pub use job::{ExecutionReport, Job, JobStatus, ProgressEntry, ReportedPose};
pub use robot::{Robot, RobotStatus};
pub use store::FleetStore;
pub use view::{job_view, robot_view, JobView, RobotView};
