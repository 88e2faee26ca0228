//! JSON map loader.
//!
//! # File format
//!
//! ```json
//! {
//!   "cells": {
//!     "11": { "s": "21" },
//!     "21": { "n": "11", "e": "22" }
//!   },
//!   "parking": ["11"],
//!   "root": "21"
//! }
//! ```
//!
//! Direction keys are the single characters `n`, `e`, `s`, `w`.  `parking`
//! and `root` are optional; the root defaults to the first cell in
//! (sorted) key order.  `BTreeMap` is used for deterministic intern order
//! regardless of the file's key order.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::Heading;

use crate::error::{MapError, MapResult};
use crate::map::{RoadMap, RoadMapBuilder};

// ── File records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MapFile {
    cells: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    parking: Vec<String>,
    #[serde(default)]
    root: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RoadMap`] from a JSON file.
pub fn load_map(path: &Path) -> MapResult<RoadMap> {
    let file = std::fs::File::open(path)?;
    map_from_reader(file)
}

/// Like [`load_map`] but accepts any `Read` source.
pub fn map_from_reader<R: Read>(reader: R) -> MapResult<RoadMap> {
    let parsed: MapFile =
        serde_json::from_reader(reader).map_err(|e| MapError::Parse(e.to_string()))?;
    build(parsed)
}

/// Like [`load_map`] but parses an in-memory string (tests, embedded maps).
pub fn map_from_str(json: &str) -> MapResult<RoadMap> {
    let parsed: MapFile =
        serde_json::from_str(json).map_err(|e| MapError::Parse(e.to_string()))?;
    build(parsed)
}

fn build(parsed: MapFile) -> MapResult<RoadMap> {
    let mut builder = RoadMapBuilder::new();

    for (from, edges) in &parsed.cells {
        // Mention the cell even if it has no out-edges.
        builder.cell(from);
        for (dir, to) in edges {
            let heading = parse_direction(dir)?;
            builder.edge(from, heading, to);
        }
    }
    for name in &parsed.parking {
        builder.parking(name);
    }
    if let Some(root) = &parsed.root {
        builder.coords_root(root);
    }

    builder.build()
}

fn parse_direction(s: &str) -> MapResult<Heading> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Heading::from_char(c)
            .ok_or_else(|| MapError::Parse(format!("invalid direction key {s:?}"))),
        _ => Err(MapError::Parse(format!("invalid direction key {s:?}"))),
    }
}
