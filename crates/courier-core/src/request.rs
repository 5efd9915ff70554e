//! Delivery request type shared by the ordering and planning stages.

use std::fmt;

use crate::GeoCoord;

/// One item to drop off at one location.
///
/// Created by the caller, permuted in place by a stop orderer, and read-only
/// from then on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryRequest {
    /// Free-form item label, echoed back in the `Deliver` command.
    pub item: String,
    /// Drop-off point.  Must be a coordinate present in the street graph.
    pub location: GeoCoord,
}

impl DeliveryRequest {
    pub fn new(item: impl Into<String>, location: GeoCoord) -> Self {
        Self { item: item.into(), location }
    }
}

impl fmt::Display for DeliveryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.item, self.location)
    }
}
