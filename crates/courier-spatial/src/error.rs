//! Spatial-subsystem error type.

use thiserror::Error;

use courier_core::GeoCoord;

/// Errors produced by `courier-spatial`.
///
/// All variants are terminal for the operation that raised them: nothing
/// here is retried, and no partial result accompanies an error.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A requested endpoint never appeared as a segment endpoint.
    #[error("coordinate {0} is not in the street graph")]
    BadCoordinate(GeoCoord),

    /// Both endpoints exist but no street path joins them.
    #[error("no route from {from} to {to}")]
    NoRoute { from: GeoCoord, to: GeoCoord },

    /// The graph source could not be read or was malformed.
    #[error("map data could not be loaded: {0}")]
    LoadFailure(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
