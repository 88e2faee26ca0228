//! Low-level motion commands.
//!
//! A plan entry tells the robot what to do *when it arrives at* a cell:
//! keep going, turn, reverse, or stop.  The wire form is the single-letter
//! token the line-follower firmware consumes.

use std::fmt;
use std::str::FromStr;

use crate::error::FleetError;
use crate::heading::Heading;

/// One motion token of a published plan.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Command {
    /// Continue through the cell without turning.  Also emitted for wait
    /// steps (same cell twice in the path).
    Straight,
    /// One 90° turn left, then continue.
    Left,
    /// One 90° turn right, then continue.
    Right,
    /// 180° turn, then continue.
    UTurn,
    /// Terminal sentinel: the plan is complete at this cell.
    Done,
}

impl Command {
    /// Single-letter wire token.
    #[inline]
    pub fn token(self) -> char {
        match self {
            Command::Straight => 'S',
            Command::Left     => 'L',
            Command::Right    => 'R',
            Command::UTurn    => 'U',
            Command::Done     => 'D',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Straight => "S",
            Command::Left     => "L",
            Command::Right    => "R",
            Command::UTurn    => "U",
            Command::Done     => "D",
        }
    }

    pub fn from_token(c: char) -> Option<Command> {
        match c.to_ascii_uppercase() {
            'S' => Some(Command::Straight),
            'L' => Some(Command::Left),
            'R' => Some(Command::Right),
            'U' => Some(Command::UTurn),
            'D' => Some(Command::Done),
            _   => None,
        }
    }

    /// The heading a robot faces after executing this command while facing
    /// `heading`.  `Straight` and `Done` do not rotate.
    #[inline]
    pub fn apply(self, heading: Heading) -> Heading {
        match self {
            Command::Straight | Command::Done => heading,
            Command::Right => heading.clockwise(),
            Command::Left  => heading.counter_clockwise(),
            Command::UTurn => heading.opposite(),
        }
    }
}

impl FromStr for Command {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Command::from_token(c)
                .ok_or_else(|| FleetError::Parse(format!("invalid command token {c:?}"))),
            _ => Err(FleetError::Parse(format!("invalid command {s:?}"))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Command {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Command {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
