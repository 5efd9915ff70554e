//! Street graph representation and builder.
//!
//! # Data layout
//!
//! The graph is an adjacency map: a [`CoordinateMap`] from each coordinate to
//! the directed [`Segment`]s that start there.
//!
//! ```text
//! (34.06, -118.44) ─▶ [ →(34.07,-118.44) "Westwood Blvd", →(34.06,-118.45) "Le Conte Ave" ]
//! (34.07, -118.44) ─▶ [ →(34.06,-118.44) "Westwood Blvd", … ]
//! ```
//!
//! Streets are undirected in the map data, so every loaded segment is stored
//! twice: forward under its start coordinate and reversed under its end
//! coordinate.  Consequently every endpoint is also a key with at least one
//! outgoing segment.
//!
//! The graph is built once and is read-only afterwards; it is `Sync`, so any
//! number of searches may share it.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over all coordinates answers nearest-coordinate
//! queries, letting callers snap an arbitrary point onto the graph before
//! routing.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use courier_core::GeoCoord;

use crate::coord_map::{CoordinateMap, DEFAULT_MAX_LOAD_FACTOR};
use crate::source::{GraphSource, StreetRecord};
use crate::{SpatialError, SpatialResult};

// ── Segment ───────────────────────────────────────────────────────────────────

/// A directed piece of a named street between two coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub start:  GeoCoord,
    pub end:    GeoCoord,
    pub street: String,
}

impl Segment {
    pub fn new(start: GeoCoord, end: GeoCoord, street: impl Into<String>) -> Self {
        Self { start, end, street: street.into() }
    }

    /// The same street piece travelled the other way.
    pub fn reversed(&self) -> Segment {
        Segment {
            start:  self.end.clone(),
            end:    self.start.clone(),
            street: self.street.clone(),
        }
    }

    /// Great-circle length in kilometres (search cost).
    #[inline]
    pub fn length_km(&self) -> f64 {
        self.start.distance_km(&self.end)
    }

    /// Great-circle length in miles (reported distances).
    #[inline]
    pub fn length_miles(&self) -> f64 {
        self.start.distance_miles(&self.end)
    }

    /// Bearing in degrees counter-clockwise from east, `[0, 360)`.
    #[inline]
    pub fn bearing(&self) -> f64 {
        self.start.bearing_to(&self.end)
    }

    /// Angle swept turning from `self` onto `next`, `[0, 360)`.
    #[inline]
    pub fn turn_angle_to(&self, next: &Segment) -> f64 {
        courier_core::geo::turn_angle(self.bearing(), next.bearing())
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the coordinate it came from.
struct CoordEntry {
    point: [f64; 2], // [lat, lon]
    coord: GeoCoord,
}

impl RTreeObject for CoordEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CoordEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to pick the
    /// nearest intersection within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── StreetGraph ───────────────────────────────────────────────────────────────

/// Directed street graph keyed by exact coordinate, plus a spatial index.
///
/// Construct with [`StreetGraph::from_source`], [`StreetGraph::load`], or
/// [`StreetGraphBuilder`].
pub struct StreetGraph {
    adjacency:     CoordinateMap<GeoCoord, Vec<Segment>>,
    segment_count: usize,
    spatial_idx:   RTree<CoordEntry>,
}

impl StreetGraph {
    /// A graph with no coordinates.  Every routing request against it fails
    /// with [`SpatialError::BadCoordinate`].
    pub fn empty() -> Self {
        StreetGraphBuilder::new().build()
    }

    /// Build a graph from every record in `source`.
    pub fn from_source<S: GraphSource>(source: S) -> SpatialResult<Self> {
        let mut builder = StreetGraphBuilder::new();
        builder.extend_from(source)?;
        Ok(builder.build())
    }

    /// Replace the graph's contents with the records from `source`.
    ///
    /// The new graph is built off to the side; on failure `self` is left
    /// exactly as it was.
    pub fn load<S: GraphSource>(&mut self, source: S) -> SpatialResult<()> {
        let mut builder =
            StreetGraphBuilder::with_max_load_factor(self.adjacency.max_load_factor());
        builder.extend_from(source)?;
        *self = builder.build();
        Ok(())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    /// Number of distinct coordinates (graph nodes).
    pub fn coordinate_count(&self) -> usize {
        self.adjacency.size()
    }

    /// Number of directed segments (each loaded street piece counts twice).
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// The segments leaving `coord`, or `None` if `coord` is not in the graph.
    #[inline]
    pub fn segments_from(&self, coord: &GeoCoord) -> Option<&[Segment]> {
        self.adjacency.find(coord).map(Vec::as_slice)
    }

    /// `true` if `coord` is a node with at least one outgoing segment.
    #[inline]
    pub fn contains(&self, coord: &GeoCoord) -> bool {
        self.segments_from(coord).is_some_and(|segs| !segs.is_empty())
    }

    /// Every coordinate in the graph, in unspecified order.
    pub fn coordinates(&self) -> impl Iterator<Item = &GeoCoord> + '_ {
        self.adjacency.iter().map(|(coord, _)| coord)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The graph coordinate closest to `(lat, lon)`.
    ///
    /// Returns `None` only if the graph is empty.
    pub fn nearest_coordinate(&self, lat: f64, lon: f64) -> Option<&GeoCoord> {
        self.spatial_idx
            .nearest_neighbor(&[lat, lon])
            .map(|e| &e.coord)
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`StreetGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use courier_core::GeoCoord;
/// use courier_spatial::StreetGraphBuilder;
///
/// let a = GeoCoord::parse("34.0600", "-118.4400").unwrap();
/// let b = GeoCoord::parse("34.0610", "-118.4400").unwrap();
///
/// let mut builder = StreetGraphBuilder::new();
/// builder.add_street("Westwood Blvd", a.clone(), b.clone());
/// let graph = builder.build();
/// assert_eq!(graph.coordinate_count(), 2);
/// assert_eq!(graph.segment_count(), 2); // both directions
/// assert_eq!(graph.segments_from(&b).unwrap()[0].end, a);
/// ```
pub struct StreetGraphBuilder {
    adjacency:     CoordinateMap<GeoCoord, Vec<Segment>>,
    segment_count: usize,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::with_max_load_factor(DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Use a non-default maximum load factor for the adjacency map.
    pub fn with_max_load_factor(max_load_factor: f64) -> Self {
        Self {
            adjacency:     CoordinateMap::with_max_load_factor(max_load_factor),
            segment_count: 0,
        }
    }

    /// Add an undirected street piece: `start → end` and `end → start`.
    pub fn add_street(&mut self, street: &str, start: GeoCoord, end: GeoCoord) {
        let forward = Segment::new(start, end, street);
        let reverse = forward.reversed();
        self.add_directed_segment(forward);
        self.add_directed_segment(reverse);
    }

    /// Add a single **directed** segment under its start coordinate.
    ///
    /// Only the start coordinate becomes a node; the end is reachable but,
    /// unless some other segment starts there, is not a valid route endpoint.
    pub fn add_directed_segment(&mut self, segment: Segment) {
        match self.adjacency.find_mut(&segment.start) {
            Some(list) => list.push(segment),
            None => self.adjacency.associate(segment.start.clone(), vec![segment]),
        }
        self.segment_count += 1;
    }

    /// Add every segment of one street record.
    pub fn add_record(&mut self, record: StreetRecord) -> SpatialResult<()> {
        let street = record.name.trim();
        if street.is_empty() {
            return Err(SpatialError::LoadFailure(format!(
                "street record with {} segment(s) has no name",
                record.segments.len()
            )));
        }
        for (start, end) in record.segments {
            self.add_street(street, start, end);
        }
        Ok(())
    }

    /// Pull every record from `source` into the builder.
    pub fn extend_from<S: GraphSource>(&mut self, source: S) -> SpatialResult<()> {
        let records = source.into_records()?;
        let streets = records.len();
        for record in records {
            self.add_record(record)?;
        }
        log::info!(
            "loaded {streets} streets: {} coordinates, {} directed segments",
            self.adjacency.size(),
            self.segment_count
        );
        Ok(())
    }

    pub fn coordinate_count(&self) -> usize { self.adjacency.size() }
    pub fn segment_count(&self) -> usize { self.segment_count }

    /// Consume the builder and produce a [`StreetGraph`].
    ///
    /// Time complexity: O(N log N) for the R-tree bulk load, N = coordinates.
    pub fn build(self) -> StreetGraph {
        let entries: Vec<CoordEntry> = self
            .adjacency
            .iter()
            .map(|(coord, _)| CoordEntry {
                point: [coord.lat(), coord.lon()],
                coord: coord.clone(),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        StreetGraph {
            adjacency: self.adjacency,
            segment_count: self.segment_count,
            spatial_idx,
        }
    }
}

impl Default for StreetGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
