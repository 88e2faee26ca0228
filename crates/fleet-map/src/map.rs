//! Road map representation and builder.
//!
//! # Data layout
//!
//! Cell names are interned into dense [`CellId`]s at build time.  Per-cell
//! data then lives in plain `Vec`s indexed by `CellId`:
//!
//! - `out[cell]` is a `[Option<CellId>; 4]` of out-neighbors by heading —
//!   at most one out-edge per direction, which the builder enforces.
//! - `coords[cell]` is the derived `(x, y)` coordinate used by the
//!   Manhattan heuristic and by observers for layout.
//! - `parking[cell]` marks the cells idle robots may occupy indefinitely.
//!
//! # Coordinate derivation
//!
//! Coordinates are not part of the input.  `build()` breadth-first-walks
//! the out-edges from a root cell, assigning `root = (0, 0)` and each newly
//! discovered cell its parent's coordinate plus the edge heading's unit
//! vector.  A cell's coordinate is fixed at first visit; cells unreachable
//! from the root keep `(0, 0)`.

use std::collections::{HashMap, VecDeque};

use fleet_core::{CellId, Heading};

use crate::error::{MapError, MapResult};

// ── RoadMap ───────────────────────────────────────────────────────────────────

/// Immutable directed road graph with derived coordinates and parking set.
///
/// Construct with [`RoadMapBuilder`] or the loaders in [`crate::loader`].
#[derive(Debug)]
pub struct RoadMap {
    /// Cell name per id.  Indexed by `CellId`.
    names: Vec<String>,
    /// Name → id intern table.
    index: HashMap<String, CellId>,
    /// Out-neighbors per cell, one slot per heading.
    out: Vec<[Option<CellId>; 4]>,
    /// Derived `(x, y)` per cell.
    coords: Vec<(i32, i32)>,
    /// Parking flag per cell.
    parking: Vec<bool>,
}

impl RoadMap {
    // ── Intern table ──────────────────────────────────────────────────────

    /// Resolve a cell name to its id.
    pub fn cell(&self, name: &str) -> MapResult<CellId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| MapError::UnknownCell(name.to_string()))
    }

    /// The name a cell id was interned from.
    #[inline]
    pub fn name(&self, cell: CellId) -> &str {
        &self.names[cell.index()]
    }

    pub fn cell_count(&self) -> usize {
        self.names.len()
    }

    /// Iterator over all cell ids in intern order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.names.len() as u32).map(CellId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// The out-neighbor of `cell` in direction `heading`, if any.
    #[inline]
    pub fn neighbor(&self, cell: CellId, heading: Heading) -> Option<CellId> {
        self.out[cell.index()][heading.index()]
    }

    /// Iterator over `(heading, neighbor)` pairs of all out-edges of `cell`.
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = (Heading, CellId)> + '_ {
        let row = self.out[cell.index()];
        Heading::ALL
            .into_iter()
            .filter_map(move |h| row[h.index()].map(|to| (h, to)))
    }

    /// The heading of the edge `a → b`, or `None` if no such edge exists.
    pub fn direction_between(&self, a: CellId, b: CellId) -> Option<Heading> {
        self.neighbors(a).find(|&(_, to)| to == b).map(|(h, _)| h)
    }

    // ── Metric ────────────────────────────────────────────────────────────

    /// Derived coordinate of `cell`.
    #[inline]
    pub fn coordinates(&self, cell: CellId) -> (i32, i32) {
        self.coords[cell.index()]
    }

    /// Manhattan distance between two cells in derived coordinates.
    #[inline]
    pub fn manhattan(&self, a: CellId, b: CellId) -> u32 {
        let (ax, ay) = self.coords[a.index()];
        let (bx, by) = self.coords[b.index()];
        ax.abs_diff(bx) + ay.abs_diff(by)
    }

    // ── Parking ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_parking(&self, cell: CellId) -> bool {
        self.parking[cell.index()]
    }

    /// Iterator over all parking cells in intern order.
    pub fn parking_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells().filter(|&c| self.parking[c.index()])
    }
}

// ── RoadMapBuilder ────────────────────────────────────────────────────────────

/// Construct a [`RoadMap`] incrementally, then call [`build`](Self::build).
///
/// Cell names are interned on first mention, whether as an edge endpoint or
/// via [`cell`](Self::cell).  Edges are recorded raw and validated in
/// `build()`, which rejects two out-edges from one cell in the same
/// direction and parking designations naming cells that were never
/// mentioned.
///
/// # Example
///
/// ```
/// use fleet_core::Heading;
/// use fleet_map::RoadMapBuilder;
///
/// let mut b = RoadMapBuilder::new();
/// b.edge("a", Heading::East, "b");
/// b.edge("b", Heading::West, "a");
/// b.parking("a");
/// let map = b.build().unwrap();
/// assert_eq!(map.cell_count(), 2);
/// ```
pub struct RoadMapBuilder {
    names:   Vec<String>,
    index:   HashMap<String, CellId>,
    edges:   Vec<RawEdge>,
    parking: Vec<String>,
    root:    Option<String>,
}

struct RawEdge {
    from:    CellId,
    heading: Heading,
    to:      CellId,
}

impl RoadMapBuilder {
    pub fn new() -> Self {
        Self {
            names:   Vec::new(),
            index:   HashMap::new(),
            edges:   Vec::new(),
            parking: Vec::new(),
            root:    None,
        }
    }

    /// Intern `name`, returning its id.  Idempotent.
    pub fn cell(&mut self, name: &str) -> CellId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = CellId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Record the directed edge `from → to` labeled `heading`.
    ///
    /// Both endpoints are interned.  Duplicate directions out of one cell
    /// are rejected later, in [`build`](Self::build).
    pub fn edge(&mut self, from: &str, heading: Heading, to: &str) {
        let from = self.cell(from);
        let to = self.cell(to);
        self.edges.push(RawEdge { from, heading, to });
    }

    /// Designate `name` a parking cell.  The cell must be mentioned by at
    /// least one edge (or [`cell`](Self::cell)) before `build()`.
    pub fn parking(&mut self, name: &str) {
        self.parking.push(name.to_string());
    }

    /// Choose the root cell for coordinate derivation.  Defaults to the
    /// first cell interned.
    pub fn coords_root(&mut self, name: &str) {
        self.root = Some(name.to_string());
    }

    pub fn cell_count(&self) -> usize {
        self.names.len()
    }

    /// Validate and produce the immutable [`RoadMap`].
    pub fn build(self) -> MapResult<RoadMap> {
        if self.names.is_empty() {
            return Err(MapError::Empty);
        }
        let n = self.names.len();

        // ── Adjacency, rejecting duplicate out-directions ─────────────────
        let mut out = vec![[None; 4]; n];
        for e in &self.edges {
            let slot = &mut out[e.from.index()][e.heading.index()];
            if slot.is_some() {
                return Err(MapError::DuplicateEdge {
                    from: self.names[e.from.index()].clone(),
                    dir:  e.heading,
                });
            }
            *slot = Some(e.to);
        }

        // ── Parking set ───────────────────────────────────────────────────
        let mut parking = vec![false; n];
        for name in &self.parking {
            let id = self
                .index
                .get(name)
                .copied()
                .ok_or_else(|| MapError::UnknownCell(name.clone()))?;
            parking[id.index()] = true;
        }

        // ── Coordinates by BFS from the root ──────────────────────────────
        let root = match &self.root {
            Some(name) => self
                .index
                .get(name)
                .copied()
                .ok_or_else(|| MapError::UnknownCell(name.clone()))?,
            None => CellId(0),
        };

        let mut coords = vec![(0, 0); n];
        let mut visited = vec![false; n];
        visited[root.index()] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(cur) = queue.pop_front() {
            let (cx, cy) = coords[cur.index()];
            for (h, nb) in Heading::ALL
                .into_iter()
                .filter_map(|h| out[cur.index()][h.index()].map(|to| (h, to)))
            {
                if !visited[nb.index()] {
                    visited[nb.index()] = true;
                    let (dx, dy) = h.unit_vector();
                    coords[nb.index()] = (cx + dx, cy + dy);
                    queue.push_back(nb);
                }
            }
        }

        Ok(RoadMap {
            names: self.names,
            index: self.index,
            out,
            coords,
            parking,
        })
    }
}

impl Default for RoadMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
