//! The `FleetStore` — robot and job tables, the queue, and reservations.
//!
//! # Layout
//!
//! Robots and jobs live in insertion-ordered `Vec`s with an id → index
//! side table.  Insertion order is load-bearing twice over: the allocator
//! breaks distance ties between idle robots by registration order, and the
//! queue preserves job submission order for fairness.
//!
//! The store performs no locking and emits no events itself; the service
//! layer owns both.  Mutating helpers return what changed so the caller
//! can build the matching broadcast events.

use std::collections::{HashMap, HashSet, VecDeque};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use fleet_core::{CellId, FleetError, FleetResult, Heading, JobId, RobotId, Stamp};
use fleet_map::RoadMap;
use fleet_plan::ReservationTable;

use crate::job::{Job, JobStatus};
use crate::robot::{Robot, RobotStatus};

/// Display colors handed out at registration.
const PALETTE: [&str; 8] = [
    "#E74C3C", "#8E44AD", "#3498DB", "#16A085", "#F39C12", "#D35400", "#2ECC71", "#E84393",
];

/// All mutable fleet state.  Wrap in a mutex; see `fleet-service`.
pub struct FleetStore {
    robots:      Vec<Robot>,
    robot_index: HashMap<RobotId, usize>,
    jobs:        Vec<Job>,
    job_index:   HashMap<JobId, usize>,
    /// Queued job ids in submission order.
    queue:       VecDeque<JobId>,
    pub reservations: ReservationTable,
    rng:         SmallRng,
}

impl FleetStore {
    pub fn new() -> Self {
        Self {
            robots:       Vec::new(),
            robot_index:  HashMap::new(),
            jobs:         Vec::new(),
            job_index:    HashMap::new(),
            queue:        VecDeque::new(),
            reservations: ReservationTable::new(),
            rng:          SmallRng::from_entropy(),
        }
    }

    // ── Robots ────────────────────────────────────────────────────────────

    /// Create or refresh a robot record.
    ///
    /// A refreshed robot keeps its color but is otherwise reset: idle at
    /// the reported pose with no remaining path.  Returns the previously
    /// assigned job id, if any, so the caller can fail it and release the
    /// robot's reservations.
    pub fn register_robot(
        &mut self,
        id:      Option<RobotId>,
        cell:    CellId,
        heading: Heading,
        now:     Stamp,
    ) -> (RobotId, String, Option<JobId>) {
        let id = id.unwrap_or_else(RobotId::generate);

        if let Some(&idx) = self.robot_index.get(&id) {
            let robot = &mut self.robots[idx];
            let previous_job = robot.job.take();
            robot.cell = cell;
            robot.heading = heading;
            robot.status = RobotStatus::Idle;
            robot.last_seen = now;
            robot.path.clear();
            return (id, robot.color.clone(), previous_job);
        }

        let color = PALETTE[self.rng.gen_range(0..PALETTE.len())].to_string();
        self.robot_index.insert(id.clone(), self.robots.len());
        self.robots.push(Robot {
            id:        id.clone(),
            cell,
            heading,
            status:    RobotStatus::Idle,
            last_seen: now,
            job:       None,
            path:      Vec::new(),
            color:     color.clone(),
        });
        (id, color, None)
    }

    pub fn robot(&self, id: &RobotId) -> FleetResult<&Robot> {
        self.robot_index
            .get(id)
            .map(|&idx| &self.robots[idx])
            .ok_or_else(|| FleetError::UnknownRobot(id.clone()))
    }

    pub fn robot_mut(&mut self, id: &RobotId) -> FleetResult<&mut Robot> {
        match self.robot_index.get(id) {
            Some(&idx) => Ok(&mut self.robots[idx]),
            None       => Err(FleetError::UnknownRobot(id.clone())),
        }
    }

    /// All robots, in registration order.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.iter()
    }

    /// Ids of all idle robots, in registration order.
    pub fn idle_robot_ids(&self) -> Vec<RobotId> {
        self.robots
            .iter()
            .filter(|r| r.is_idle())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Cells statically occupied by idle robots other than `except`.
    ///
    /// These are the planner's static blockers: an idle robot holds no
    /// reservations but isn't going anywhere either.
    pub fn static_blockers(&self, except: &RobotId) -> HashSet<CellId> {
        self.robots
            .iter()
            .filter(|r| r.is_idle() && &r.id != except)
            .map(|r| r.cell)
            .collect()
    }

    // ── Jobs ──────────────────────────────────────────────────────────────

    /// Create a queued job and append it to the queue.
    pub fn submit_job(&mut self, pickup: CellId, drop: CellId, now: Stamp) -> JobId {
        let id = JobId::generate();
        self.job_index.insert(id.clone(), self.jobs.len());
        self.jobs.push(Job::queued(id.clone(), pickup, drop, now));
        self.queue.push_back(id.clone());
        id
    }

    /// Create a system job born assigned to `rid` (auto-park, ad-hoc path
    /// requests).  Never enters the queue.
    pub fn create_system_job(
        &mut self,
        pickup: CellId,
        drop:   CellId,
        rid:    RobotId,
        now:    Stamp,
    ) -> JobId {
        let id = JobId::generate();
        self.job_index.insert(id.clone(), self.jobs.len());
        self.jobs.push(Job::assigned(id.clone(), pickup, drop, rid, now));
        id
    }

    pub fn job(&self, id: &JobId) -> FleetResult<&Job> {
        self.job_index
            .get(id)
            .map(|&idx| &self.jobs[idx])
            .ok_or_else(|| FleetError::UnknownJob(id.clone()))
    }

    pub fn job_mut(&mut self, id: &JobId) -> FleetResult<&mut Job> {
        match self.job_index.get(id) {
            Some(&idx) => Ok(&mut self.jobs[idx]),
            None       => Err(FleetError::UnknownJob(id.clone())),
        }
    }

    /// All jobs ever created, in creation order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    // ── Queue ─────────────────────────────────────────────────────────────

    /// Snapshot of queued job ids in submission order, skipping any job
    /// whose status has moved on.
    pub fn queued_job_ids(&self) -> Vec<JobId> {
        self.queue
            .iter()
            .filter(|id| {
                self.job(id)
                    .map(|j| j.status == JobStatus::Queued)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn remove_from_queue(&mut self, id: &JobId) {
        self.queue.retain(|q| q != id);
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    // ── Parking ───────────────────────────────────────────────────────────

    /// The free parking cell nearest to `from`.
    ///
    /// "Free" means no idle robot stands on it.  Ties are broken by cell
    /// name, so the choice is stable across calls.
    pub fn nearest_free_parking(&self, map: &RoadMap, from: CellId) -> Option<CellId> {
        let occupied: HashSet<CellId> = self
            .robots
            .iter()
            .filter(|r| r.is_idle())
            .map(|r| r.cell)
            .collect();

        map.parking_cells()
            .filter(|p| !occupied.contains(p))
            .min_by_key(|&p| (map.manhattan(from, p), map.name(p).to_string()))
    }

    // ── Reset ─────────────────────────────────────────────────────────────

    /// Clear the queue and all reservations, fail every `assigned` job,
    /// and idle every robot.  Returns the failed job ids (events are the
    /// caller's concern).
    pub fn reset(&mut self) -> Vec<JobId> {
        self.queue.clear();
        self.reservations.clear();

        let mut failed = Vec::new();
        for job in &mut self.jobs {
            if job.status == JobStatus::Assigned {
                job.status = JobStatus::Failed;
                failed.push(job.id.clone());
            }
        }
        for robot in &mut self.robots {
            robot.clear_assignment();
        }
        failed
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}
