//! `PlanCompiler` — turns an ordered list of stops into turn-by-turn
//! commands.
//!
//! # Legs
//!
//! A plan for stops `s1 … sn` has `n + 1` legs:
//!
//! ```text
//! depot → s1 → s2 → … → sn → depot
//! ```
//!
//! Every leg is routed before any command is emitted, so a failing leg
//! (`BadCoordinate` / `NoRoute`) aborts the whole compile with no partial
//! plan.  With the `parallel` feature the legs are routed on Rayon worker
//! threads; the graph is shared read-only and each search owns its state.
//!
//! # Emission rules (per leg)
//!
//! 1. The leg's first segment opens a `Proceed`.
//! 2. A segment on the same street as its predecessor adds its length to the
//!    open `Proceed`.
//! 3. A segment on a different street emits a `Turn` (when the turn angle
//!    classifies as left or right) and then opens a new `Proceed`.
//! 4. A `Deliver` for the stop's item closes every leg except the return to
//!    the depot.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use courier_core::{DeliveryRequest, GeoCoord};
use courier_spatial::{Route, Router, Segment, StreetGraph};

use crate::command::{Command, Direction, TurnSide};
use crate::{PlanError, PlanResult};

/// The compiled output: commands in driving order plus the street distance
/// of every segment driven.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryPlan {
    pub commands:    Vec<Command>,
    pub total_miles: f64,
}

impl DeliveryPlan {
    /// Number of `Deliver` commands.
    pub fn delivery_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_deliver()).count()
    }
}

pub struct PlanCompiler<'g, R: Router> {
    graph:  &'g StreetGraph,
    router: R,
}

impl<'g, R: Router> PlanCompiler<'g, R> {
    pub fn new(graph: &'g StreetGraph, router: R) -> Self {
        Self { graph, router }
    }

    pub fn graph(&self) -> &'g StreetGraph {
        self.graph
    }

    /// Compile `requests`, visited in the given order, into a round trip from
    /// `depot`.
    ///
    /// With no requests the plan is the single depot → depot leg, which
    /// still fails with `BadCoordinate` if the depot is not on the map.
    pub fn compile(&self, depot: &GeoCoord, requests: &[DeliveryRequest]) -> PlanResult<DeliveryPlan> {
        let stops: Vec<&GeoCoord> = std::iter::once(depot)
            .chain(requests.iter().map(|r| &r.location))
            .chain(std::iter::once(depot))
            .collect();
        let legs: Vec<(&GeoCoord, &GeoCoord)> = stops.windows(2).map(|w| (w[0], w[1])).collect();

        let routes = self.route_legs(&legs)?;

        let mut plan = DeliveryPlan::default();
        for (i, route) in routes.iter().enumerate() {
            plan.total_miles += emit_leg(&route.segments, &mut plan.commands);
            if let Some(request) = requests.get(i) {
                plan.commands.push(Command::Deliver { item: request.item.clone() });
            }
        }

        log::debug!(
            "compiled {} legs into {} commands, {:.3} mi",
            legs.len(),
            plan.commands.len(),
            plan.total_miles
        );
        Ok(plan)
    }

    #[cfg(not(feature = "parallel"))]
    fn route_legs(&self, legs: &[(&GeoCoord, &GeoCoord)]) -> PlanResult<Vec<Route>> {
        legs.iter()
            .map(|&(from, to)| self.router.route(self.graph, from, to).map_err(PlanError::from))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn route_legs(&self, legs: &[(&GeoCoord, &GeoCoord)]) -> PlanResult<Vec<Route>> {
        legs.par_iter()
            .map(|&(from, to)| self.router.route(self.graph, from, to).map_err(PlanError::from))
            .collect()
    }
}

/// Append the commands for one leg's segments and return the leg's length in
/// miles.
pub(crate) fn emit_leg(segments: &[Segment], commands: &mut Vec<Command>) -> f64 {
    let mut miles = 0.0;
    let mut prev: Option<&Segment> = None;

    for seg in segments {
        let length = seg.length_miles();
        miles += length;

        match prev {
            Some(p) if p.street == seg.street => {
                if let Some(Command::Proceed { distance_miles, .. }) = commands.last_mut() {
                    *distance_miles += length;
                }
            }
            Some(p) => {
                if let Some(side) = TurnSide::from_turn_angle(p.turn_angle_to(seg)) {
                    commands.push(Command::Turn { side, street: seg.street.clone() });
                }
                commands.push(proceed(seg, length));
            }
            None => commands.push(proceed(seg, length)),
        }
        prev = Some(seg);
    }
    miles
}

fn proceed(seg: &Segment, length: f64) -> Command {
    Command::Proceed {
        direction:      Direction::from_bearing(seg.bearing()),
        street:         seg.street.clone(),
        distance_miles: length,
    }
}
