//! Discrete time model.
//!
//! # Design
//!
//! Reservations and trajectories are indexed by whole seconds since the Unix
//! epoch.  `Stamp` is that integer; all schedule arithmetic on it is exact,
//! and `(cell, stamp)` pairs are hashable map keys.  There is no clock
//! synchronization requirement beyond monotonicity inside one server
//! process.
//!
//! The [`Clock`] trait is the single seam between real time and tests: the
//! service reads `clock.now()` at each observable operation, so tests drive
//! it with a [`ManualClock`] and get reproducible reservation tables.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

// ── Stamp ─────────────────────────────────────────────────────────────────────

/// A discrete point in time: whole seconds since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Stamp(pub i64);

impl Stamp {
    pub const ZERO: Stamp = Stamp(0);

    /// The current wall-clock second.
    pub fn now() -> Stamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Stamp(secs)
    }

    /// The stamp `n` seconds after `self`.
    #[inline]
    pub fn offset(self, n: i64) -> Stamp {
        Stamp(self.0 + n)
    }
}

impl std::ops::Add<i64> for Stamp {
    type Output = Stamp;
    #[inline]
    fn add(self, rhs: i64) -> Stamp {
        Stamp(self.0 + rhs)
    }
}

impl std::ops::Sub for Stamp {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Stamp) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of the current [`Stamp`].
///
/// Production uses [`SystemClock`]; tests use [`ManualClock`] so allocator
/// ticks and reservations land on known times.
pub trait Clock: Send + Sync {
    fn now(&self) -> Stamp;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Stamp {
        Stamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start: Stamp) -> Self {
        Self(AtomicI64::new(start.0))
    }

    /// Jump to an absolute time.
    pub fn set(&self, to: Stamp) {
        self.0.store(to.0, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Stamp {
        Stamp(self.0.load(Ordering::SeqCst))
    }
}
