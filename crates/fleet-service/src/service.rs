//! The `FleetService` struct and its client-facing operations.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use fleet_core::{
    CellId, Clock, FleetError, FleetResult, Heading, JobId, PlannerConfig, RobotId, Stamp,
};
use fleet_map::RoadMap;
use fleet_plan::{build_plan, translate, Planner, SpaceTimeAstar};
use fleet_state::{
    job_view, robot_view, Event, ExecutionReport, FleetStore, JobStatus, JobView, ProgressEntry,
    ReportedPose, RobotStatus, RobotView,
};

/// Broadcast buffer depth.  Laggards lose the oldest events and can
/// resynchronize from [`FleetService::snapshot`].
const EVENT_CAPACITY: usize = 256;

// ── Request / response shapes ─────────────────────────────────────────────────

/// Result of a registration: the (possibly server-generated) id and the
/// robot's display color.
#[derive(Clone, Debug)]
pub struct Registration {
    pub robot_id: RobotId,
    pub color:    String,
}

/// A robot's location report.
#[derive(Clone, Debug)]
pub struct LocationUpdate {
    pub robot_id:   RobotId,
    pub cell:       String,
    pub heading:    Option<Heading>,
    /// Index of the plan step the robot just reached, if it tracks one.
    pub step_index: Option<u32>,
    /// `true` when the robot reports completing its current job.
    pub job_done:   bool,
}

/// One `(node, dir)` entry of an execution report.
#[derive(Clone, Debug)]
pub struct NodeWithDir {
    pub node: String,
    pub dir:  Option<Heading>,
}

/// A robot's end-of-run execution report.
#[derive(Clone, Debug)]
pub struct ExecutionNotice {
    pub robot_id: RobotId,
    pub job_id:   Option<JobId>,
    pub nodes:    Vec<NodeWithDir>,
}

/// An ad-hoc path request: plan pickup→drop for this robot right now,
/// bypassing the queue.
#[derive(Clone, Debug)]
pub struct PathRequest {
    pub robot_id: RobotId,
    pub node:     String,
    pub heading:  Heading,
    pub pickup:   String,
    pub drop:     String,
}

/// Everything an observer needs to render current state.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    pub robots: Vec<(RobotId, RobotView)>,
    pub jobs:   Vec<JobView>,
}

// ── FleetService ──────────────────────────────────────────────────────────────

/// The authoritative fleet planner.
///
/// Generic over the [`Planner`] so alternative search strategies can be
/// dropped in; [`FleetService::new`] wires up the default space-time A*.
pub struct FleetService<P: Planner> {
    map:     Arc<RoadMap>,
    config:  PlannerConfig,
    planner: P,
    clock:   Arc<dyn Clock>,
    store:   Mutex<FleetStore>,
    events:  broadcast::Sender<Event>,
}

impl FleetService<SpaceTimeAstar> {
    /// Service with the default space-time A* planner.
    pub fn new(map: Arc<RoadMap>, config: PlannerConfig, clock: Arc<dyn Clock>) -> Self {
        let planner = SpaceTimeAstar::new(&config);
        Self::with_planner(map, config, planner, clock)
    }
}

impl<P: Planner> FleetService<P> {
    pub fn with_planner(
        map:     Arc<RoadMap>,
        config:  PlannerConfig,
        planner: P,
        clock:   Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            map,
            config,
            planner,
            clock,
            store: Mutex::new(FleetStore::new()),
            events,
        }
    }

    pub fn map(&self) -> &RoadMap {
        &self.map
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Current time from the service's clock.
    pub fn now(&self) -> Stamp {
        self.clock.now()
    }

    /// Subscribe to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    // ── Client operations ─────────────────────────────────────────────────

    /// Register a robot, or refresh an existing one.
    ///
    /// A refreshed robot comes back idle; if it still had an assigned job,
    /// that job is failed and its reservations released (the re-register
    /// is treated as an operator intervention).
    pub fn register_robot(
        &self,
        id:      Option<RobotId>,
        cell:    &str,
        heading: Heading,
    ) -> FleetResult<Registration> {
        let cell = self.map.cell(cell)?;
        let now = self.clock.now();
        let mut store = self.store.lock();

        let (rid, color, previous_job) = store.register_robot(id, cell, heading, now);
        if let Some(jid) = previous_job {
            store.reservations.release_owner(&rid);
            let mut failed = false;
            if let Ok(job) = store.job_mut(&jid) {
                if job.status == JobStatus::Assigned {
                    job.status = JobStatus::Failed;
                    failed = true;
                }
            }
            if failed {
                tracing::warn!(robot = %rid, job = %jid, "re-registration failed the robot's active job");
                self.emit_job(&store, &jid);
            }
        }

        tracing::info!(robot = %rid, cell = self.map.name(cell), "robot registered");
        self.emit_robot(&store, &rid);
        Ok(Registration { robot_id: rid, color })
    }

    /// Queue a pickup→drop transport job.  Both cells must exist.
    pub fn submit_job(&self, pickup: &str, drop: &str) -> FleetResult<JobId> {
        let pickup = self.map.cell(pickup)?;
        let drop = self.map.cell(drop)?;
        let now = self.clock.now();
        let mut store = self.store.lock();

        let jid = store.submit_job(pickup, drop, now);
        tracing::info!(job = %jid, pickup = self.map.name(pickup), drop = self.map.name(drop), "job queued");
        self.emit_job(&store, &jid);
        Ok(jid)
    }

    /// A robot asking for work.  Refreshes `last_seen`; returns its
    /// assigned job, if any.
    pub fn poll_task(&self, rid: &RobotId) -> FleetResult<Option<JobView>> {
        let now = self.clock.now();
        let mut store = self.store.lock();

        let job_id = {
            let robot = store.robot_mut(rid)?;
            robot.last_seen = now;
            robot.job.clone()
        };
        match job_id {
            Some(jid) => Ok(Some(job_view(&self.map, store.job(&jid)?))),
            None      => Ok(None),
        }
    }

    /// A robot reporting where it is (and optionally that it finished).
    ///
    /// On `job_done`: the job is completed, the robot's assignment and
    /// reservations are cleared, and — unless it stopped on a parking
    /// cell — an auto-park job is synthesized on the spot.
    pub fn update_location(&self, update: LocationUpdate) -> FleetResult<()> {
        let cell = self.map.cell(&update.cell)?;
        let now = self.clock.now();
        let mut store = self.store.lock();

        let (heading_now, current_job) = {
            let robot = store.robot_mut(&update.robot_id)?;
            robot.cell = cell;
            robot.last_seen = now;
            if let Some(h) = update.heading {
                robot.heading = h;
            }
            robot.trim_path_at(cell);
            (robot.heading, robot.job.clone())
        };

        // Progress tracking.
        if let (Some(step_index), Some(jid)) = (update.step_index, current_job.as_ref()) {
            let mut touched = false;
            if let Ok(job) = store.job_mut(jid) {
                job.progress_index = Some(step_index);
                job.progress_trace.push(ProgressEntry {
                    step_index,
                    cell,
                    heading: heading_now,
                    at: now,
                });
                touched = true;
            }
            if touched {
                self.emit_job(&store, jid);
            }
        }

        if update.job_done {
            if let Some(jid) = current_job {
                let mut touched = false;
                if let Ok(job) = store.job_mut(&jid) {
                    job.status = JobStatus::Done;
                    touched = true;
                }
                if touched {
                    tracing::info!(robot = %update.robot_id, job = %jid, "job done");
                    self.emit_job(&store, &jid);
                }
            }
            if let Ok(robot) = store.robot_mut(&update.robot_id) {
                robot.clear_assignment();
            }
            store.reservations.release_owner(&update.robot_id);

            if !self.map.is_parking(cell) {
                self.auto_park(&mut store, &update.robot_id, cell, now);
            }
        }

        self.emit_robot(&store, &update.robot_id);
        Ok(())
    }

    /// A robot reporting the cells it actually traversed.
    ///
    /// Idempotent with the `job_done` location update: marking an already
    /// done job done again changes nothing, and clearing an empty
    /// assignment is a no-op.  An unknown `job_id` is ignored, matching
    /// the lenient wire contract.
    pub fn report_execution(&self, notice: ExecutionNotice) -> FleetResult<()> {
        let now = self.clock.now();
        let mut store = self.store.lock();

        let current_heading = store.robot(&notice.robot_id)?.heading;
        let mut poses = Vec::with_capacity(notice.nodes.len());
        for entry in &notice.nodes {
            poses.push(ReportedPose {
                cell:    self.map.cell(&entry.node)?,
                heading: entry.dir.unwrap_or(current_heading),
            });
        }

        if let Some(last) = poses.last() {
            let (cell, heading) = (last.cell, last.heading);
            if let Ok(robot) = store.robot_mut(&notice.robot_id) {
                robot.cell = cell;
                robot.heading = heading;
            }
        }

        let mut done_job = None;
        if let Some(jid) = &notice.job_id {
            if let Ok(job) = store.job_mut(jid) {
                job.reports.push(ExecutionReport {
                    robot: notice.robot_id.clone(),
                    poses,
                    at: now,
                });
                job.status = JobStatus::Done;
                done_job = Some(jid.clone());
            }
        }
        if let Some(jid) = done_job {
            self.emit_job(&store, &jid);
        }

        if let Ok(robot) = store.robot_mut(&notice.robot_id) {
            robot.clear_assignment();
        }
        store.reservations.release_owner(&notice.robot_id);
        self.emit_robot(&store, &notice.robot_id);
        Ok(())
    }

    /// Plan and commit a two-leg trajectory for one robot immediately,
    /// bypassing the queue.  Surfaces planner failures to the caller.
    pub fn request_path(&self, req: PathRequest) -> FleetResult<JobView> {
        let start = self.map.cell(&req.node)?;
        let pickup = self.map.cell(&req.pickup)?;
        let drop = self.map.cell(&req.drop)?;
        let now = self.clock.now();
        let mut store = self.store.lock();

        {
            let robot = store.robot_mut(&req.robot_id)?;
            robot.cell = start;
            robot.heading = req.heading;
            robot.last_seen = now;
        }

        let blockers = store.static_blockers(&req.robot_id);
        let leg1 = self
            .planner
            .plan(&self.map, &store.reservations, &blockers, start, pickup, now, &req.robot_id)
            .map_err(|_| FleetError::NoPathToPickup)?;
        let t1 = now + (leg1.len() as i64 - 1);
        let leg2 = self
            .planner
            .plan(&self.map, &store.reservations, &blockers, pickup, drop, t1, &req.robot_id)
            .map_err(|_| FleetError::NoPathToDrop)?;

        let mut full = leg1.cells.clone();
        full.extend_from_slice(&leg2.cells[1..]);

        store.reservations.release_owner(&req.robot_id);
        store.reservations.reserve(&full, now, &req.robot_id);

        // Leg 2 chains from the heading leg 1 ends with; its command list
        // is appended whole because leg 2 starts at the pickup with no
        // edge traversed yet.
        let (mut commands, after_pickup) = translate(&self.map, &leg1.cells, req.heading);
        let (leg2_commands, _) = translate(&self.map, &leg2.cells, after_pickup);
        commands.extend(leg2_commands);
        let plan = build_plan(&full, &commands);

        let jid = store.create_system_job(pickup, drop, req.robot_id.clone(), now);
        {
            let job = store.job_mut(&jid)?;
            job.path = full.clone();
            job.plan = plan;
        }
        {
            let robot = store.robot_mut(&req.robot_id)?;
            robot.status = RobotStatus::Busy;
            robot.job = Some(jid.clone());
            robot.path = full;
        }

        tracing::info!(robot = %req.robot_id, job = %jid, "ad-hoc path committed");
        self.emit_job(&store, &jid);
        self.emit_robot(&store, &req.robot_id);
        Ok(job_view(&self.map, store.job(&jid)?))
    }

    /// Clear the queue and every reservation, fail all assigned jobs, and
    /// idle every robot.
    pub fn reset(&self) {
        let mut store = self.store.lock();
        let failed = store.reset();
        for jid in &failed {
            self.emit_job(&store, jid);
        }
        let robot_ids: Vec<RobotId> = store.robots().map(|r| r.id.clone()).collect();
        for rid in &robot_ids {
            self.emit_robot(&store, rid);
        }
        tracing::info!(failed_jobs = failed.len(), robots = robot_ids.len(), "state reset");
    }

    /// Current state for a newly connected observer.
    pub fn snapshot(&self) -> StateSnapshot {
        let store = self.store.lock();
        StateSnapshot {
            robots: store
                .robots()
                .map(|r| (r.id.clone(), robot_view(&self.map, r)))
                .collect(),
            jobs: store.jobs().map(|j| job_view(&self.map, j)).collect(),
        }
    }

    // ── Internals shared with the allocator ───────────────────────────────

    pub(crate) fn store(&self) -> &Mutex<FleetStore> {
        &self.store
    }

    pub(crate) fn planner(&self) -> &P {
        &self.planner
    }

    pub(crate) fn emit_robot(&self, store: &FleetStore, rid: &RobotId) {
        if let Ok(robot) = store.robot(rid) {
            let _ = self.events.send(Event::RobotUpdate {
                robot: rid.clone(),
                info:  robot_view(&self.map, robot),
            });
        }
    }

    pub(crate) fn emit_job(&self, store: &FleetStore, jid: &JobId) {
        if let Ok(job) = store.job(jid) {
            let _ = self.events.send(Event::JobUpdate {
                job: job_view(&self.map, job),
            });
        }
    }

    /// Synthesize a parking job for a robot that finished on a workspace
    /// cell.  No free bay → no job; no path → the job is failed and the
    /// robot stays idle.
    fn auto_park(&self, store: &mut FleetStore, rid: &RobotId, cell: CellId, now: Stamp) {
        let Some(spot) = store.nearest_free_parking(&self.map, cell) else {
            tracing::warn!(robot = %rid, cell = self.map.name(cell), "no free parking bay");
            return;
        };
        let jid = store.create_system_job(cell, spot, rid.clone(), now);

        let blockers = store.static_blockers(rid);
        match self
            .planner
            .plan(&self.map, &store.reservations, &blockers, cell, spot, now, rid)
        {
            Ok(trajectory) => {
                store.reservations.release_owner(rid);
                store.reservations.reserve(&trajectory.cells, now, rid);

                let heading = store.robot(rid).map(|r| r.heading).unwrap_or(Heading::South);
                let (commands, _) = translate(&self.map, &trajectory.cells, heading);
                let plan = build_plan(&trajectory.cells, &commands);

                if let Ok(job) = store.job_mut(&jid) {
                    job.path = trajectory.cells.clone();
                    job.plan = plan;
                }
                if let Ok(robot) = store.robot_mut(rid) {
                    robot.status = RobotStatus::Busy;
                    robot.job = Some(jid.clone());
                    robot.path = trajectory.cells;
                }
                tracing::info!(robot = %rid, bay = self.map.name(spot), "auto-park dispatched");
                self.emit_job(store, &jid);
            }
            Err(_) => {
                if let Ok(job) = store.job_mut(&jid) {
                    job.status = JobStatus::Failed;
                }
                tracing::warn!(robot = %rid, bay = self.map.name(spot), "no path to parking bay");
            }
        }
    }
}
