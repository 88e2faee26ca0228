//! Identifier types.
//!
//! Cells are interned by the road map into a dense `CellId(u32)` so the
//! planner's hot loops index arrays instead of hashing strings.  Robots and
//! jobs keep string identities: robot ids are chosen by the client at
//! registration (or generated server-side), job ids are generated, and both
//! travel over the wire verbatim.

use std::fmt;

// ── CellId ────────────────────────────────────────────────────────────────────

/// Index of a cell in the road map's intern table.
///
/// The inner integer is `pub` for direct indexing into per-cell `Vec`s via
/// `id.index()`.  The wire form of a cell is always its string name; only
/// the map can translate between the two.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub u32);

impl CellId {
    /// Sentinel meaning "no valid cell" — equivalent to `u32::MAX`.
    pub const INVALID: CellId = CellId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for CellId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellId({})", self.0)
    }
}

// ── String-backed ids ─────────────────────────────────────────────────────────

/// Generate a string-backed id wrapper.
///
/// `$len` is the number of hex characters taken from a v4 UUID when the id
/// is generated server-side.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $len:expr) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh short id (`$len` hex chars of a v4 UUID).
            pub fn generate() -> Self {
                let hex = uuid::Uuid::new_v4().simple().to_string();
                Self(hex[..$len].to_string())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// Identity of a registered robot.  Client-chosen or server-generated.
    pub struct RobotId, 6
}

string_id! {
    /// Identity of a transport job (operator-submitted or synthesized).
    pub struct JobId, 8
}
