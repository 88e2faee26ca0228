//! Robot heading as a four-value state machine.
//!
//! A heading changes only through turn commands, so the three transitions
//! (`clockwise`, `counter_clockwise`, `opposite`) are explicit table lookups
//! rather than computed rotations.  The wire form is a single lowercase
//! character (`n`, `e`, `s`, `w`), matching the graph's edge labels.

use std::fmt;
use std::str::FromStr;

use crate::error::FleetError;

/// A cardinal direction — the direction a robot is pointing, and the label
/// of every graph edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings in index order (`North = 0`, clockwise).
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Dense index for per-direction arrays (`[T; 4]`).
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Heading::North => 0,
            Heading::East  => 1,
            Heading::South => 2,
            Heading::West  => 3,
        }
    }

    /// One 90° turn to the right.
    #[inline]
    pub fn clockwise(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East  => Heading::South,
            Heading::South => Heading::West,
            Heading::West  => Heading::North,
        }
    }

    /// One 90° turn to the left.
    #[inline]
    pub fn counter_clockwise(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West  => Heading::South,
            Heading::South => Heading::East,
            Heading::East  => Heading::North,
        }
    }

    /// The 180° rotation.
    #[inline]
    pub fn opposite(self) -> Heading {
        match self {
            Heading::North => Heading::South,
            Heading::South => Heading::North,
            Heading::East  => Heading::West,
            Heading::West  => Heading::East,
        }
    }

    /// Unit vector in derived-coordinate space.  North decreases `y`
    /// (screen convention, as the coordinate derivation expects).
    #[inline]
    pub fn unit_vector(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::South => (0, 1),
            Heading::East  => (1, 0),
            Heading::West  => (-1, 0),
        }
    }

    /// Single-character wire/graph form.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Heading::North => 'n',
            Heading::East  => 'e',
            Heading::South => 's',
            Heading::West  => 'w',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Heading::North => "n",
            Heading::East  => "e",
            Heading::South => "s",
            Heading::West  => "w",
        }
    }

    /// Parse the single-character form.  Case-insensitive.
    pub fn from_char(c: char) -> Option<Heading> {
        match c.to_ascii_lowercase() {
            'n' => Some(Heading::North),
            'e' => Some(Heading::East),
            's' => Some(Heading::South),
            'w' => Some(Heading::West),
            _   => None,
        }
    }
}

impl FromStr for Heading {
    type Err = FleetError;

    /// Accepts the single-character wire form or the full word, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Heading::North),
            "e" | "east"  => Ok(Heading::East),
            "s" | "south" => Ok(Heading::South),
            "w" | "west"  => Ok(Heading::West),
            other => Err(FleetError::Parse(format!("invalid heading {other:?}"))),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Heading {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Heading {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
