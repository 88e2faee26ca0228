//! `fleet-service` — the planner's concurrent core.
//!
//! # Structure
//!
//! [`FleetService`] owns all mutable state behind one coarse mutex and
//! exposes the client-facing operations (register, submit, poll, location
//! updates, execution reports, ad-hoc paths, reset).  Every operation
//! follows the same discipline:
//!
//! ```text
//! lock → read clock → mutate store → emit events → unlock
//! ```
//!
//! Events are sent while the lock is held so any one observer sees them in
//! an order consistent with the state writes; sending is fire-and-forget
//! (`tokio::sync::broadcast`, bounded, lossy for laggards).
//!
//! The allocator ([`run_allocator`]) is a periodic background task whose
//! whole body is the synchronous [`FleetService::allocate_tick`] — tests
//! drive that method directly with a manual clock and never sleep.
//!
//! Critical sections are short (at most one bounded A* search) and never
//! held across `.await`, which is why a synchronous `parking_lot` mutex
//! sits inside an async server without trouble.

pub mod allocator;
pub mod service;


pub use allocator::run_allocator;
pub use service::{
    ExecutionNotice, FleetService, LocationUpdate, NodeWithDir, PathRequest, Registration,
    StateSnapshot,
};
