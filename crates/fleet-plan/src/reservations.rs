//! The space-time reservation table.
//!
//! Maps `(cell, second)` to the robot that owns the cell at that second.
//! The table guarantees vertex exclusivity (one owner per key — the map
//! structure itself enforces it); it does not detect edge-swap conflicts,
//! where two robots exchange adjacent cells within one second.  The
//! planner's idle-robot blockers and wait penalty keep those statistically
//! rare; `can_reserve` is the single choke point to strengthen if that
//! ever changes.
//!
//! Entries in the past are dead weight.  The allocator calls
//! [`release_before`](ReservationTable::release_before) every tick; without
//! it the table grows without bound.

use rustc_hash::FxHashMap;

use fleet_core::{CellId, RobotId, Stamp};

/// `(cell, time) → owner` with bulk insert/release by trajectory and owner.
#[derive(Default)]
pub struct ReservationTable {
    slots: FxHashMap<(CellId, Stamp), RobotId>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The robot holding `cell` at `t`, if any.
    pub fn owner(&self, cell: CellId, t: Stamp) -> Option<&RobotId> {
        self.slots.get(&(cell, t))
    }

    /// `true` if `cell` at `t` is unowned or owned by `rid`.
    ///
    /// This is the planner's safety primitive: a robot never conflicts with
    /// its own (soon-to-be-replaced) reservations.
    #[inline]
    pub fn is_free_for(&self, cell: CellId, t: Stamp, rid: &RobotId) -> bool {
        match self.slots.get(&(cell, t)) {
            None        => true,
            Some(owner) => owner == rid,
        }
    }

    /// `true` iff every `(cells[i], t0+i)` is free or already owned by `rid`.
    pub fn can_reserve(&self, cells: &[CellId], t0: Stamp, rid: &RobotId) -> bool {
        cells
            .iter()
            .enumerate()
            .all(|(i, &cell)| self.is_free_for(cell, t0 + i as i64, rid))
    }

    /// Write `(cells[i], t0+i) → rid` for every i.
    ///
    /// Unconditional: callers check [`can_reserve`](Self::can_reserve)
    /// first.  Re-reserving a slot the robot already owns is idempotent.
    pub fn reserve(&mut self, cells: &[CellId], t0: Stamp, rid: &RobotId) {
        for (i, &cell) in cells.iter().enumerate() {
            self.slots.insert((cell, t0 + i as i64), rid.clone());
        }
    }

    /// Remove every entry owned by `rid`.
    pub fn release_owner(&mut self, rid: &RobotId) {
        self.slots.retain(|_, owner| owner != rid);
    }

    /// Remove every entry whose time is strictly before `t`.
    pub fn release_before(&mut self, t: Stamp) {
        self.slots.retain(|&(_, at), _| at >= t);
    }

    /// Transfer every entry owned by `old` to `new`.
    ///
    /// No dispatcher operation uses this yet; it exists for handover
    /// schemes where one robot takes over another's committed trajectory.
    pub fn swap_owner(&mut self, old: &RobotId, new: &RobotId) {
        for owner in self.slots.values_mut() {
            if owner == old {
                *owner = new.clone();
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterator over all `((cell, time), owner)` entries, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&(CellId, Stamp), &RobotId)> {
        self.slots.iter()
    }
}
