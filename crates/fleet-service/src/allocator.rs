//! The background allocator.
//!
//! # Tick shape
//!
//! ```text
//! every allocator_period:
//!   ① GC       — drop reservations older than now
//!   ② Scan     — queued jobs in submission order:
//!        no idle robots          → stop this tick
//!        pick nearest idle robot → plan leg 1 (cell → pickup)
//!                                → plan leg 2 (pickup → drop)
//!        either leg unplannable  → job stays queued, next job
//!        commit: release robot's reservations, reserve the full
//!        trajectory, translate to commands, publish plan, emit events
//! ```
//!
//! Scanning in submission order with nearest-robot selection keeps old
//! jobs from being starved by new ones: the head job gets first pick of
//! the idle pool every tick until it can be planned.
//!
//! The body is the synchronous [`FleetService::allocate_tick`]; the async
//! wrapper only sleeps and calls it, so tests exercise identical code
//! without a runtime.

use std::sync::Arc;

use fleet_core::{RobotId, Stamp};
use fleet_plan::{build_plan, translate, Planner};
use fleet_state::{JobStatus, RobotStatus};

use crate::service::FleetService;

impl<P: Planner> FleetService<P> {
    /// Run one allocator iteration at time `now`.  Returns the number of
    /// jobs assigned.
    pub fn allocate_tick(&self, now: Stamp) -> usize {
        let mut store = self.store().lock();

        // ① Reservations in the past are garbage.
        store.reservations.release_before(now);

        let mut assigned = 0;

        // ② Queued jobs in submission order.
        for jid in store.queued_job_ids() {
            let (pickup, drop) = match store.job(&jid) {
                Ok(job) if job.status == JobStatus::Queued => (job.pickup, job.drop),
                _ => continue,
            };

            let idle = store.idle_robot_ids();
            if idle.is_empty() {
                break;
            }

            // Nearest idle robot to the pickup; `min_by_key` keeps the
            // earliest-registered robot on distance ties.
            let distance = |rid: &RobotId| {
                store
                    .robot(rid)
                    .map(|r| self.map().manhattan(r.cell, pickup))
                    .unwrap_or(u32::MAX)
            };
            let Some(rid) = idle.into_iter().min_by_key(|rid| distance(rid)) else {
                break;
            };
            let Ok((start, heading)) = store.robot(&rid).map(|r| (r.cell, r.heading)) else {
                continue;
            };

            // Two-leg plan.  Failure is not fatal: the job stays queued
            // and is retried next tick.
            let blockers = store.static_blockers(&rid);
            let Ok(leg1) = self.planner().plan(
                self.map(),
                &store.reservations,
                &blockers,
                start,
                pickup,
                now,
                &rid,
            ) else {
                tracing::debug!(job = %jid, robot = %rid, "no path to pickup; job stays queued");
                continue;
            };
            let t1 = now + (leg1.len() as i64 - 1);
            let Ok(leg2) = self.planner().plan(
                self.map(),
                &store.reservations,
                &blockers,
                pickup,
                drop,
                t1,
                &rid,
            ) else {
                tracing::debug!(job = %jid, robot = %rid, "no path pickup->drop; job stays queued");
                continue;
            };

            // Leg 2 re-starts at the pickup; drop its duplicate first cell.
            let mut full_path = leg1.cells.clone();
            full_path.extend_from_slice(&leg2.cells[1..]);

            // Commit: replace whatever this robot had reserved.
            store.reservations.release_owner(&rid);
            store.reservations.reserve(&full_path, now, &rid);

            // Commands chain across the legs on the returned heading; the
            // second command list is appended whole (leg 2 has traversed
            // no edge yet at the pickup).
            let (mut commands, after_pickup) = translate(self.map(), &leg1.cells, heading);
            let (leg2_commands, _) = translate(self.map(), &leg2.cells, after_pickup);
            commands.extend(leg2_commands);
            let plan = build_plan(&full_path, &commands);

            if let Ok(job) = store.job_mut(&jid) {
                job.status = JobStatus::Assigned;
                job.assigned_robot = Some(rid.clone());
                job.path = full_path.clone();
                job.plan = plan;
                job.progress_index = None;
            }
            store.remove_from_queue(&jid);
            if let Ok(robot) = store.robot_mut(&rid) {
                robot.status = RobotStatus::Busy;
                robot.job = Some(jid.clone());
                robot.path = full_path.clone();
            }

            tracing::info!(
                job = %jid,
                robot = %rid,
                steps = full_path.len(),
                "job assigned"
            );
            self.emit_job(&store, &jid);
            self.emit_robot(&store, &rid);
            assigned += 1;
        }

        assigned
    }
}

/// Run the allocator forever with the configured period.
///
/// Spawn once at startup:
///
/// ```rust,ignore
/// tokio::spawn(run_allocator(service.clone()));
/// ```
pub async fn run_allocator<P: Planner>(service: Arc<FleetService<P>>) {
    let mut ticker = tokio::time::interval(service.config().allocator_period);
    loop {
        ticker.tick().await;
        let now = service.now();
        let assigned = service.allocate_tick(now);
        if assigned > 0 {
            tracing::debug!(assigned, "allocator tick");
        }
    }
}
