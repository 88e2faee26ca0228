//! Robot records.

use serde::Serialize;

use fleet_core::{CellId, Heading, JobId, RobotId, Stamp};

/// Whether a robot is available for work.
///
/// Invariant: a robot is `Busy` iff it has an assigned job.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Idle,
    Busy,
}

/// One registered robot.
///
/// `cell` and `heading` are the last values the robot self-reported; the
/// planner treats them as ground truth.  Records are created by
/// registration and never destroyed — a silent robot just ages out through
/// `last_seen`.
#[derive(Clone, Debug)]
pub struct Robot {
    pub id:        RobotId,
    pub cell:      CellId,
    pub heading:   Heading,
    pub status:    RobotStatus,
    pub last_seen: Stamp,
    /// The job this robot is executing, if any.
    pub job:       Option<JobId>,
    /// Remaining cells of the committed trajectory; trimmed as the robot
    /// reports progress, cleared on completion.
    pub path:      Vec<CellId>,
    /// Display color assigned at first registration.
    pub color:     String,
}

impl Robot {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.status == RobotStatus::Idle
    }

    /// Drop the path prefix before `cell`, if `cell` lies on the path.
    pub fn trim_path_at(&mut self, cell: CellId) {
        if let Some(pos) = self.path.iter().position(|&c| c == cell) {
            self.path.drain(..pos);
        }
    }

    /// Clear the assignment: idle, no job, no remaining path.
    pub fn clear_assignment(&mut self) {
        self.status = RobotStatus::Idle;
        self.job = None;
        self.path.clear();
    }
}
