//! `courier-spatial` — coordinate-keyed storage, street graph, and routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`coord_map`] | `CoordinateMap` (expandable chained hash map), `Hashable`   |
//! | [`network`]   | `Segment`, `StreetGraph` (adjacency + R-tree), `StreetGraphBuilder` |
//! | [`source`]    | `GraphSource` trait, `StreetRecord`, `CsvSource`            |
//! | [`router`]    | `Router` trait, `Route`, `AStarRouter`, `DijkstraRouter`    |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Segment` and `Route`.  |

pub mod coord_map;
pub mod error;
pub mod network;
pub mod router;
pub mod source;

#[cfg(test)]
mod tests;

pub use coord_map::{CoordinateMap, Hashable, DEFAULT_MAX_LOAD_FACTOR};
pub use error::{SpatialError, SpatialResult};
pub use network::{Segment, StreetGraph, StreetGraphBuilder};
pub use router::{AStarRouter, DijkstraRouter, Route, Router};
pub use source::{CsvSource, GraphSource, StreetRecord};
