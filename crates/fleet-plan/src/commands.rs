//! Path → motion-command translation.
//!
//! A trajectory is a cell sequence; robots consume *commands* phrased
//! relative to their own heading.  The translator walks the path, emits one
//! command per step, and tracks the heading each turn produces, so the
//! caller can chain a second leg from where the first one leaves off.
//!
//! The published plan pairs each cell with the command to perform on
//! arrival there and terminates with a [`Command::Done`] sentinel.

use fleet_core::{CellId, Command, Heading};
use fleet_map::RoadMap;

/// One entry of a published plan: arriving at `cell`, perform `command`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PlanStep {
    pub cell:    CellId,
    pub command: Command,
}

/// The turn that takes `current` to `target`.
///
/// The four headings are exhaustively one of: equal, one clockwise step,
/// one counter-clockwise step, or opposite.
pub fn turn_between(current: Heading, target: Heading) -> Command {
    if current == target {
        Command::Straight
    } else if current.clockwise() == target {
        Command::Right
    } else if current.counter_clockwise() == target {
        Command::Left
    } else {
        Command::UTurn
    }
}

/// Translate `path` into per-step commands, starting from `heading`.
///
/// Returns the commands (one per consecutive cell pair) and the heading the
/// robot faces after executing all of them.  Wait steps (same cell twice)
/// emit [`Command::Straight`] and leave the heading unchanged.  A step with
/// no graph edge should be unreachable for planner output; it is logged and
/// handled as a best-effort U-turn.
pub fn translate(map: &RoadMap, path: &[CellId], heading: Heading) -> (Vec<Command>, Heading) {
    let mut commands = Vec::with_capacity(path.len().saturating_sub(1));
    let mut current = heading;

    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            commands.push(Command::Straight);
            continue;
        }
        let command = match map.direction_between(a, b) {
            Some(target) => turn_between(current, target),
            None => {
                tracing::warn!(
                    from = map.name(a),
                    to = map.name(b),
                    "path step without a graph edge"
                );
                Command::UTurn
            }
        };
        current = command.apply(current);
        commands.push(command);
    }

    (commands, current)
}

/// Pair `path` with `commands` into the published plan form, appending the
/// terminal [`Command::Done`] entry.
///
/// `commands` must have exactly one entry per edge of `path`
/// (`path.len() - 1`); a single-cell path with no commands yields just the
/// `Done` entry.
pub fn build_plan(path: &[CellId], commands: &[Command]) -> Vec<PlanStep> {
    debug_assert_eq!(
        commands.len() + 1,
        path.len().max(1),
        "one command per path edge"
    );
    let mut plan: Vec<PlanStep> = path
        .iter()
        .zip(commands)
        .map(|(&cell, &command)| PlanStep { cell, command })
        .collect();
    if let Some(&last) = path.last() {
        plan.push(PlanStep { cell: last, command: Command::Done });
    }
    plan
}
