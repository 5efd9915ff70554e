//! Routing trait and the default A* implementation.
//!
//! # Pluggability
//!
//! `courier-plan` calls routing via the [`Router`] trait, so applications can
//! swap in other search strategies without touching the planner.  The default
//! [`AStarRouter`] is guided by great-circle distance to the goal;
//! [`DijkstraRouter`] runs the same search with no guidance and is mostly
//! useful as a reference when checking A* results.
//!
//! # Cost units
//!
//! Search costs are great-circle **kilometres**.  `Route` exposes the total
//! in kilometres and converts to miles on request.
//!
//! # Search state
//!
//! Each call owns its open set and a [`CoordinateMap`] of per-coordinate
//! bookkeeping (predecessor, g-score, f-score).  Nothing is cached between
//! calls, so one graph can serve concurrent searches.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use courier_core::{GeoCoord, KM_PER_MILE};

use crate::coord_map::CoordinateMap;
use crate::network::{Segment, StreetGraph};
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the segments to drive, in order, and the
/// total great-circle length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Segments from start to end; `segments[i].end == segments[i + 1].start`.
    pub segments: Vec<Segment>,
    /// Optimal path cost (the goal's g-score), kilometres.
    pub distance_km: f64,
}

impl Route {
    fn trivial() -> Self {
        Route { segments: Vec::new(), distance_km: 0.0 }
    }

    pub fn distance_miles(&self) -> f64 {
        self.distance_km / KM_PER_MILE
    }

    /// `true` if the start and end are the same coordinate.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }

    /// Street names along the route with consecutive repeats collapsed.
    pub fn streets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for seg in &self.segments {
            if names.last() != Some(&seg.street.as_str()) {
                names.push(&seg.street);
            }
        }
        names
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable point-to-point routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a planner can route the legs of
/// a delivery plan on Rayon worker threads.
pub trait Router: Send + Sync {
    /// Shortest street path from `start` to `end`.
    ///
    /// - [`SpatialError::BadCoordinate`] if either endpoint is not a graph
    ///   node (checked before any search).
    /// - [`SpatialError::NoRoute`] if both are nodes but disconnected.
    /// - `start == end` yields an empty route, not an error.
    fn route(&self, graph: &StreetGraph, start: &GeoCoord, end: &GeoCoord) -> SpatialResult<Route>;
}

// ── Implementations ───────────────────────────────────────────────────────────

/// A* search with the great-circle distance to the goal as heuristic.
///
/// The heuristic never exceeds the true street distance, so the returned
/// route is optimal.
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &StreetGraph, start: &GeoCoord, end: &GeoCoord) -> SpatialResult<Route> {
        search(graph, start, end, |coord| coord.distance_km(end))
    }
}

/// Uninformed best-first search (A* with a zero heuristic).
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &StreetGraph, start: &GeoCoord, end: &GeoCoord) -> SpatialResult<Route> {
        search(graph, start, end, |_| 0.0)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// How the search first reached a coordinate: the predecessor and the index
/// of the segment in the predecessor's adjacency list.
struct Via {
    from:  GeoCoord,
    index: usize,
}

/// Per-coordinate bookkeeping.
struct Visit {
    via: Option<Via>,
    /// Best known cost from the start, km.
    g:   f64,
    /// `g` plus the heuristic estimate to the goal, km.
    f:   f64,
}

/// Open-set entry.  Ordered so `BinaryHeap` (a max-heap) pops the lowest
/// f-score first, and among equal f-scores the earliest pushed.
struct Open {
    f:     f64,
    seq:   u64,
    coord: GeoCoord,
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

fn search(
    graph: &StreetGraph,
    start: &GeoCoord,
    end: &GeoCoord,
    heuristic: impl Fn(&GeoCoord) -> f64,
) -> SpatialResult<Route> {
    for coord in [start, end] {
        if !graph.contains(coord) {
            log::debug!("route {start} → {end}: {coord} is not in the graph");
            return Err(SpatialError::BadCoordinate(coord.clone()));
        }
    }

    if start == end {
        return Ok(Route::trivial());
    }

    let mut visits: CoordinateMap<GeoCoord, Visit> = CoordinateMap::new();
    let mut open: BinaryHeap<Open> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut expanded: usize = 0;

    let f0 = heuristic(start);
    visits.associate(start.clone(), Visit { via: None, g: 0.0, f: f0 });
    open.push(Open { f: f0, seq, coord: start.clone() });

    while let Some(Open { f, coord, .. }) = open.pop() {
        // Skip stale heap entries superseded by a cheaper push.
        let g = match visits.find(&coord) {
            Some(visit) if f <= visit.f => visit.g,
            _ => continue,
        };

        if coord == *end {
            let route = reconstruct(graph, &visits, end, g);
            log::debug!(
                "route {start} → {end}: {} segments, {:.3} km, {expanded} expanded",
                route.segments.len(),
                route.distance_km
            );
            return Ok(route);
        }
        expanded += 1;

        let Some(segments) = graph.segments_from(&coord) else {
            continue;
        };
        for (index, seg) in segments.iter().enumerate() {
            let tentative = g + seg.length_km();
            let improves = visits
                .find(&seg.end)
                .is_none_or(|known| tentative < known.g);
            if !improves {
                continue;
            }

            let f = tentative + heuristic(&seg.end);
            visits.associate(
                seg.end.clone(),
                Visit {
                    via: Some(Via { from: coord.clone(), index }),
                    g: tentative,
                    f,
                },
            );
            seq += 1;
            open.push(Open { f, seq, coord: seg.end.clone() });
        }
    }

    log::debug!("route {start} → {end}: open set exhausted after {expanded} expansions");
    Err(SpatialError::NoRoute { from: start.clone(), to: end.clone() })
}

/// Walk predecessors back from `end` and return the forward segment list.
fn reconstruct(
    graph: &StreetGraph,
    visits: &CoordinateMap<GeoCoord, Visit>,
    end: &GeoCoord,
    total_km: f64,
) -> Route {
    let mut segments = Vec::new();
    let mut cur = end;
    while let Some(via) = visits.find(cur).and_then(|visit| visit.via.as_ref()) {
        let seg = graph
            .segments_from(&via.from)
            .and_then(|segs| segs.get(via.index));
        debug_assert!(seg.is_some(), "predecessor segment vanished from the graph");
        if let Some(seg) = seg {
            segments.push(seg.clone());
        }
        cur = &via.from;
    }
    segments.reverse();
    Route { segments, distance_km: total_km }
}
