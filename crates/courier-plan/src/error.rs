use courier_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    /// A leg could not be routed (`BadCoordinate` or `NoRoute`).  The whole
    /// plan is abandoned; no partial command list is returned.
    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),

    #[error("invalid planner configuration: {0}")]
    Config(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
