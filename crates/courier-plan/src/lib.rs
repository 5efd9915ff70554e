//! `courier-plan` — stop ordering, turn-by-turn plan compilation, and the
//! planner façade.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`command`]   | `Command`, `Direction`, `TurnSide`                            |
//! | [`orderer`]   | `StopOrderer` trait, `KeepOrder`, `NearestNeighbor`, `LocalSearch`, `ChainedOrderer` |
//! | [`compiler`]  | `PlanCompiler`, `DeliveryPlan`                                |
//! | [`config`]    | `PlannerConfig`, `AnnealingConfig`, `OrderingStrategy`        |
//! | [`planner`]   | `DeliveryPlanner`, `PlannedRoute`                             |
//! | [`error`]     | `PlanError`, `PlanResult<T>`                                  |
//!
//! # Pipeline (summary)
//!
//! ```text
//! requests ──StopOrderer──▶ ordered requests
//!          ──PlanCompiler──▶ Router per leg ──▶ commands + street miles
//! ```
//!
//! Ordering works on crow distances only; the street distance of the plan is
//! measured by the compiler from the routed segments.

pub mod command;
pub mod compiler;
pub mod config;
pub mod error;
pub mod orderer;
pub mod planner;


pub use command::{Command, Direction, TurnSide};
pub use compiler::{DeliveryPlan, PlanCompiler};
pub use config::{AnnealingConfig, OrderingStrategy, PlannerConfig};
pub use error::{PlanError, PlanResult};
pub use orderer::{
    crow_round_trip_miles, ChainedOrderer, KeepOrder, LocalSearch, NearestNeighbor,
    OrderingReport, StopOrderer, StopOrdererExt,
};
pub use planner::{DeliveryPlanner, PlannedRoute};
