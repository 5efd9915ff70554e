//! `courier-core` — foundational types for the `courier` route planner.
//!
//! This crate is a dependency of every other `courier-*` crate.  It has no
//! `courier-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`geo`]     | `GeoCoord`, haversine distance, bearings, turn angles    |
//! | [`request`] | `DeliveryRequest`                                        |
//! | [`rng`]     | `PlanRng` (seeded, for randomized heuristics)            |
//! | [`error`]   | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod request;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoCoord, KM_PER_MILE};
pub use request::DeliveryRequest;
pub use rng::PlanRng;
