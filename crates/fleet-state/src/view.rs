//! Wire views of robots and jobs.
//!
//! The store keeps interned `CellId`s; observers and clients speak cell
//! names.  These views render records into the JSON shapes the protocol
//! promises, with the original field names (`node`, `dir`, `current_path`,
//! `assigned_robot`, `submitted_ts`, …).

use serde::Serialize;

use fleet_core::{Heading, JobId, RobotId};
use fleet_map::RoadMap;

use crate::job::{Job, JobStatus};
use crate::robot::{Robot, RobotStatus};

// ── Robot view ────────────────────────────────────────────────────────────────

/// A robot as observers see it.
#[derive(Clone, Debug, Serialize)]
pub struct RobotView {
    pub status:       RobotStatus,
    pub node:         String,
    pub dir:          Heading,
    pub last_seen:    i64,
    pub color:        String,
    pub current_path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_job:  Option<JobId>,
}

pub fn robot_view(map: &RoadMap, robot: &Robot) -> RobotView {
    RobotView {
        status:       robot.status,
        node:         map.name(robot.cell).to_string(),
        dir:          robot.heading,
        last_seen:    robot.last_seen.0,
        color:        robot.color.clone(),
        current_path: robot.path.iter().map(|&c| map.name(c).to_string()).collect(),
        current_job:  robot.job.clone(),
    }
}

// ── Job view ──────────────────────────────────────────────────────────────────

/// One progress-trace entry on the wire.
#[derive(Clone, Debug, Serialize)]
pub struct ProgressView {
    pub step_index: u32,
    pub node:       String,
    pub dir:        Heading,
    pub ts:         i64,
}

/// One reported `(node, dir)` pose.
#[derive(Clone, Debug, Serialize)]
pub struct PoseView {
    pub node: String,
    pub dir:  Heading,
}

/// One execution report on the wire.
#[derive(Clone, Debug, Serialize)]
pub struct ReportView {
    pub robot:          RobotId,
    pub nodes_with_dir: Vec<PoseView>,
    pub ts:             i64,
}

/// A job as observers and polling robots see it.
#[derive(Clone, Debug, Serialize)]
pub struct JobView {
    pub id:             JobId,
    pub pickup:         String,
    pub drop:           String,
    pub status:         JobStatus,
    pub assigned_robot: Option<RobotId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path:           Option<Vec<String>>,
    /// `(cell, command-token)` pairs; serialized as two-element arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan:           Option<Vec<(String, String)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_str:       Option<String>,
    pub progress_index: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub progress_trace: Vec<ProgressView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reports:        Vec<ReportView>,
    pub submitted_ts:   i64,
}

pub fn job_view(map: &RoadMap, job: &Job) -> JobView {
    let path = (!job.path.is_empty())
        .then(|| job.path.iter().map(|&c| map.name(c).to_string()).collect());

    let plan: Option<Vec<(String, String)>> = (!job.plan.is_empty()).then(|| {
        job.plan
            .iter()
            .map(|s| (map.name(s.cell).to_string(), s.command.as_str().to_string()))
            .collect()
    });

    // Flat "cell cmd cell cmd …" rendering for low-bandwidth clients.
    let plan_str = plan.as_ref().map(|steps| {
        steps
            .iter()
            .map(|(cell, cmd)| format!("{cell} {cmd}"))
            .collect::<Vec<_>>()
            .join(" ")
    });

    JobView {
        id:             job.id.clone(),
        pickup:         map.name(job.pickup).to_string(),
        drop:           map.name(job.drop).to_string(),
        status:         job.status,
        assigned_robot: job.assigned_robot.clone(),
        path,
        plan,
        plan_str,
        progress_index: job.progress_index,
        progress_trace: job
            .progress_trace
            .iter()
            .map(|p| ProgressView {
                step_index: p.step_index,
                node:       map.name(p.cell).to_string(),
                dir:        p.heading,
                ts:         p.at.0,
            })
            .collect(),
        reports: job
            .reports
            .iter()
            .map(|r| ReportView {
                robot:          r.robot.clone(),
                nodes_with_dir: r
                    .poses
                    .iter()
                    .map(|p| PoseView {
                        node: map.name(p.cell).to_string(),
                        dir:  p.heading,
                    })
                    .collect(),
                ts: r.at.0,
            })
            .collect(),
        submitted_ts: job.submitted.0,
    }
}
