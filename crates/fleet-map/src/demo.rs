//! The built-in reference facility map.
//!
//! A 38-cell warehouse floor: a central driving grid with one-way stub
//! lanes around the edge that serve as parking bays.  Cell names encode
//! row-then-column, but nothing relies on that — coordinates are derived
//! from the edges like for any other map.
//!
//! Used as the server's default when no map file is given, and by tests
//! across the workspace that need a realistic topology.

use fleet_core::Heading;

use crate::map::{RoadMap, RoadMapBuilder};

/// Adjacency: `(cell, [(direction, neighbor)...])`.
const ADJACENCY: &[(&str, &[(char, &str)])] = &[
    ("11", &[('s', "21")]),
    ("12", &[('s', "22")]),
    ("13", &[('s', "23")]),
    ("15", &[('s', "25")]),
    ("21", &[('n', "11"), ('e', "22"), ('s', "31")]),
    ("22", &[('n', "12"), ('s', "32"), ('w', "21"), ('e', "23")]),
    ("23", &[('n', "13"), ('s', "33"), ('w', "22")]),
    ("24", &[('e', "25"), ('s', "34")]),
    ("25", &[('n', "15"), ('s', "35"), ('e', "26"), ('w', "24")]),
    ("26", &[('w', "25")]),
    ("31", &[('n', "21"), ('e', "32")]),
    ("32", &[('n', "22"), ('e', "33"), ('w', "31")]),
    ("33", &[('n', "23"), ('s', "43"), ('e', "34"), ('w', "32")]),
    ("34", &[('n', "24"), ('s', "44"), ('e', "35"), ('w', "33")]),
    ("35", &[('w', "34"), ('n', "25"), ('e', "36"), ('s', "45")]),
    ("36", &[('w', "35"), ('s', "46")]),
    ("42", &[('s', "52")]),
    ("43", &[('n', "33"), ('s', "53"), ('e', "44")]),
    ("44", &[('w', "43"), ('n', "34"), ('e', "45")]),
    ("45", &[('w', "44"), ('n', "35"), ('s', "65"), ('e', "46")]),
    ("46", &[('w', "45"), ('n', "36")]),
    ("51", &[('e', "52")]),
    ("52", &[('s', "62"), ('e', "53"), ('n', "42"), ('w', "51")]),
    ("53", &[('w', "52"), ('n', "43"), ('s', "63")]),
    ("56", &[('s', "66")]),
    ("62", &[('n', "52")]),
    ("63", &[('s', "73"), ('e', "64"), ('n', "53")]),
    ("64", &[('w', "63"), ('e', "65"), ('s', "84")]),
    ("65", &[('n', "45"), ('s', "75"), ('e', "66"), ('w', "64")]),
    ("66", &[('w', "65"), ('n', "56"), ('s', "76")]),
    ("71", &[('s', "81"), ('e', "72")]),
    ("72", &[('s', "82"), ('e', "73"), ('w', "71")]),
    ("73", &[('w', "72"), ('s', "83"), ('n', "63")]),
    ("75", &[('n', "65"), ('s', "85"), ('e', "76")]),
    ("76", &[('w', "75"), ('n', "66"), ('s', "86")]),
    ("81", &[('n', "71")]),
    ("82", &[('n', "72")]),
    ("83", &[('n', "73")]),
    ("84", &[('n', "64")]),
    ("85", &[('n', "75")]),
    ("86", &[('n', "76")]),
];

/// Cells idle robots may occupy indefinitely.
const PARKING: &[&str] = &[
    "81", "82", "83", "84", "85", "86", "11", "12", "13", "15", "26", "31", "46", "51", "56",
];

/// Coordinate root; bottom-left parking bay.
const ROOT: &str = "81";

/// Build the reference map.
pub fn demo_map() -> RoadMap {
    let mut b = RoadMapBuilder::new();
    for (from, edges) in ADJACENCY {
        for &(dir, to) in *edges {
            // The adjacency table only uses the four valid direction chars.
            if let Some(heading) = Heading::from_char(dir) {
                b.edge(from, heading, to);
            }
        }
    }
    for name in PARKING {
        b.parking(name);
    }
    b.coords_root(ROOT);
    b.build().expect("reference map is internally consistent")
}
