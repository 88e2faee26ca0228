//! `fleet-map` — the directed road network robots drive on.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`map`]    | `RoadMap` (interned cells + per-direction edges), `RoadMapBuilder` |
//! | [`loader`] | JSON adjacency-file loading                                |
//! | [`demo`]   | The built-in reference facility map                        |
//! | [`error`]  | `MapError`, `MapResult<T>`                                 |
//!
//! The map is immutable after construction; every query is a plain read and
//! needs no synchronization.

pub mod demo;
pub mod error;
pub mod loader;
pub mod map;


pub use demo::demo_map;
pub use error::{MapError, MapResult};
pub use loader::{load_map, map_from_reader, map_from_str};
pub use map::{RoadMap, RoadMapBuilder};
