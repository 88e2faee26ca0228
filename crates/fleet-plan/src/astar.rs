//! Space-time A* trajectory search.
//!
//! # Pluggability
//!
//! The allocator calls planning via the [`Planner`] trait, so applications
//! can swap in other algorithms (time-shifted retries, true edge-conflict
//! avoidance) without touching the control loop.  The default
//! [`SpaceTimeAstar`] matches the fleet's needs.
//!
//! # Search model
//!
//! States are `(cell, depth)` pairs; a state at depth `d` occupies its cell
//! at time `t0 + d`.  The successors of a cell are its graph neighbors plus
//! the cell itself (a wait step).  A successor is safe when its `(cell,
//! time)` slot is free or owned by the planning robot, and no *other* idle
//! robot is parked on the cell (idle robots are static blockers — they hold
//! no reservations but aren't going anywhere).
//!
//! # Cost units
//!
//! Costs are integer **decisteps**: a move costs 10, a wait costs
//! 10 + round(10 × wait_penalty).  Keeping costs integral makes the
//! priority queue totally ordered; a monotonically increasing insertion
//! counter breaks remaining ties, so identical inputs always produce the
//! identical trajectory.  The heuristic is Manhattan distance in derived
//! coordinates, scaled to decisteps.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use rustc_hash::FxHashSet;

use fleet_core::{CellId, PlannerConfig, RobotId, Stamp};
use fleet_map::RoadMap;

use crate::error::{PlanError, PlanResult};
use crate::reservations::ReservationTable;

/// Cost of one move step, in decisteps.
const STEP_COST: u32 = 10;

// ── Trajectory ────────────────────────────────────────────────────────────────

/// The result of a planning query: a cell sequence anchored at a start
/// time.  `cells[i]` is occupied at `start + i`; consecutive equal cells
/// are wait steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    pub cells: Vec<CellId>,
    pub start: Stamp,
}

impl Trajectory {
    /// Number of occupied `(cell, time)` slots (≥ 1).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The time at which the final cell is reached.
    pub fn arrival(&self) -> Stamp {
        self.start + (self.cells.len() as i64 - 1)
    }

    /// `true` if the trajectory never leaves its start cell.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() == 1
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable trajectory planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the service shares one instance
/// across the allocator task and every request handler.
pub trait Planner: Send + Sync {
    /// Compute a trajectory for `rid` from `start` to `goal`, departing at
    /// `t0`.
    ///
    /// `blocked` is the set of cells statically occupied by *other* idle
    /// robots; the caller computes it because robot state lives above this
    /// crate.
    fn plan(
        &self,
        map:          &RoadMap,
        reservations: &ReservationTable,
        blocked:      &HashSet<CellId>,
        start:        CellId,
        goal:         CellId,
        t0:           Stamp,
        rid:          &RobotId,
    ) -> PlanResult<Trajectory>;
}

// ── SpaceTimeAstar ────────────────────────────────────────────────────────────

/// Default A* over `(cell, time)` with wait steps and a depth bound.
pub struct SpaceTimeAstar {
    max_depth:  u32,
    /// Extra decisteps a wait costs on top of the move cost.
    wait_extra: u32,
}

impl SpaceTimeAstar {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            max_depth:  config.search_max_depth,
            wait_extra: (config.wait_penalty * f64::from(STEP_COST)).round() as u32,
        }
    }
}

impl Default for SpaceTimeAstar {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

/// Search-arena entry; trajectories are reconstructed by walking `parent`.
struct Node {
    cell:   CellId,
    depth:  u32,
    g:      u32,
    parent: usize,
}

impl Planner for SpaceTimeAstar {
    fn plan(
        &self,
        map:          &RoadMap,
        reservations: &ReservationTable,
        blocked:      &HashSet<CellId>,
        start:        CellId,
        goal:         CellId,
        t0:           Stamp,
        rid:          &RobotId,
    ) -> PlanResult<Trajectory> {
        let mut nodes = vec![Node { cell: start, depth: 0, g: 0, parent: usize::MAX }];

        // Min-heap on (f, insertion counter). Reverse makes BinaryHeap (max)
        // behave as a min-heap; the counter makes pop order total.
        let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
        let mut counter: u64 = 0;
        open.push(Reverse((map.manhattan(start, goal) * STEP_COST, counter, 0)));

        // Closed at push time, keyed on (cell, depth).
        let mut visited: FxHashSet<(CellId, u32)> = FxHashSet::default();
        visited.insert((start, 0));

        while let Some(Reverse((_, _, idx))) = open.pop() {
            let (cell, depth, g) = {
                let n = &nodes[idx];
                (n.cell, n.depth, n.g)
            };

            if cell == goal {
                return Ok(reconstruct(&nodes, idx, t0));
            }
            if depth >= self.max_depth {
                continue;
            }

            let next_depth = depth + 1;
            let next_time = t0 + i64::from(next_depth);

            // Successors: graph neighbors, then the wait step.
            let neighbors = map.neighbors(cell).map(|(_, to)| to);
            for next in neighbors.chain(std::iter::once(cell)) {
                if visited.contains(&(next, next_depth)) {
                    continue;
                }
                if !reservations.is_free_for(next, next_time, rid) {
                    continue;
                }
                if blocked.contains(&next) {
                    continue;
                }
                visited.insert((next, next_depth));

                let step = if next == cell { STEP_COST + self.wait_extra } else { STEP_COST };
                let ng = g + step;
                let f = ng + map.manhattan(next, goal) * STEP_COST;

                nodes.push(Node { cell: next, depth: next_depth, g: ng, parent: idx });
                counter += 1;
                open.push(Reverse((f, counter, nodes.len() - 1)));
            }
        }

        Err(PlanError::NoPath { from: start, to: goal })
    }
}

fn reconstruct(nodes: &[Node], goal_idx: usize, t0: Stamp) -> Trajectory {
    let mut cells = Vec::with_capacity(nodes[goal_idx].depth as usize + 1);
    let mut idx = goal_idx;
    loop {
        cells.push(nodes[idx].cell);
        if nodes[idx].parent == usize::MAX {
            break;
        }
        idx = nodes[idx].parent;
    }
    cells.reverse();
    Trajectory { cells, start: t0 }
}
