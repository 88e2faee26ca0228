//! Planner configuration.

use std::time::Duration;

/// Tunables of the planning and allocation engine.
///
/// Typically constructed with [`PlannerConfig::default`] and overridden
/// field-by-field by the application crate.
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Sleep between allocator iterations.  Default: 500 ms.
    pub allocator_period: Duration,

    /// Maximum search depth (steps from the start cell) before the
    /// space-time search gives up.  Bounds both planning latency and the
    /// length of any reservation run.  Default: 60.
    pub search_max_depth: u32,

    /// Extra cost of a wait step relative to a move (a move costs 1.0, a
    /// wait costs 1.0 + `wait_penalty`).  A value just above 1.0 makes the
    /// planner prefer waiting over detours that are two or more steps
    /// longer.  Default: 1.1.
    pub wait_penalty: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            allocator_period: Duration::from_millis(500),
            search_max_depth: 60,
            wait_penalty:     1.1,
        }
    }
}
