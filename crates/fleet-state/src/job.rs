//! Job records: transport orders, their progress, and execution reports.

use serde::Serialize;

use fleet_core::{CellId, Heading, JobId, RobotId, Stamp};
use fleet_plan::PlanStep;

/// Lifecycle of a job.
///
/// Transitions are monotone — `Queued → Assigned → Done` — except that
/// `Assigned → Failed` happens on reset (or when an auto-park plan cannot
/// be found).  Jobs are never deleted.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Assigned,
    Done,
    Failed,
}

/// A `(cell, heading)` pair reported by a robot after execution.
#[derive(Clone, Debug)]
pub struct ReportedPose {
    pub cell:    CellId,
    pub heading: Heading,
}

/// One progress-trace entry, appended when a robot reports a step index.
#[derive(Clone, Debug)]
pub struct ProgressEntry {
    pub step_index: u32,
    pub cell:       CellId,
    pub heading:    Heading,
    pub at:         Stamp,
}

/// A robot's end-of-run report of the cells it actually traversed.
#[derive(Clone, Debug)]
pub struct ExecutionReport {
    pub robot: RobotId,
    pub poses: Vec<ReportedPose>,
    pub at:    Stamp,
}

/// One transport order: drive to `pickup`, then deliver to `drop`.
#[derive(Clone, Debug)]
pub struct Job {
    pub id:             JobId,
    pub pickup:         CellId,
    pub drop:           CellId,
    pub status:         JobStatus,
    pub assigned_robot: Option<RobotId>,
    /// Full planned cell sequence (both legs, waits included).  Empty
    /// until assignment.
    pub path:           Vec<CellId>,
    /// The published `(cell, command)` plan.  Empty until assignment.
    pub plan:           Vec<PlanStep>,
    pub submitted:      Stamp,
    /// Index of the last plan step the robot reported reaching.
    pub progress_index: Option<u32>,
    pub progress_trace: Vec<ProgressEntry>,
    pub reports:        Vec<ExecutionReport>,
}

impl Job {
    /// A fresh operator-submitted job, waiting in the queue.
    pub fn queued(id: JobId, pickup: CellId, drop: CellId, now: Stamp) -> Self {
        Self {
            id,
            pickup,
            drop,
            status: JobStatus::Queued,
            assigned_robot: None,
            path: Vec::new(),
            plan: Vec::new(),
            submitted: now,
            progress_index: None,
            progress_trace: Vec::new(),
            reports: Vec::new(),
        }
    }

    /// A system-synthesized job born already assigned to `rid` (auto-park,
    /// ad-hoc path requests).
    pub fn assigned(id: JobId, pickup: CellId, drop: CellId, rid: RobotId, now: Stamp) -> Self {
        Self {
            status: JobStatus::Assigned,
            assigned_robot: Some(rid),
            ..Self::queued(id, pickup, drop, now)
        }
    }
}
