//! Unit tests for courier-spatial.
//!
//! All tests use hand-crafted graphs so they run without any map file.

#[cfg(test)]
mod helpers {
    use courier_core::GeoCoord;

    use crate::{StreetGraph, StreetRecord};

    pub fn c(lat: &str, lon: &str) -> GeoCoord {
        GeoCoord::parse(lat, lon).unwrap()
    }

    /// Build a small grid graph for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0.00,0.00)  1:(0.00,0.01)  2:(0.00,0.02)
    ///   3:(0.02,0.00)                 4:(0.01,0.02)
    ///
    /// Streets: A St 0-1-2, C St 2-4, B St 0-3, D St 3-4
    ///
    /// Shortest path 0→4:
    ///   0→1→2→4 ≈ 0.03°  vs  0→3→4 ≈ 0.042°
    pub fn grid_graph() -> (StreetGraph, [GeoCoord; 5]) {
        let n0 = c("0.00", "0.00");
        let n1 = c("0.00", "0.01");
        let n2 = c("0.00", "0.02");
        let n3 = c("0.02", "0.00");
        let n4 = c("0.01", "0.02");

        let records = vec![
            StreetRecord::new("A St", vec![(n0.clone(), n1.clone()), (n1.clone(), n2.clone())]),
            StreetRecord::new("C St", vec![(n2.clone(), n4.clone())]),
            StreetRecord::new("B St", vec![(n0.clone(), n3.clone())]),
            StreetRecord::new("D St", vec![(n3.clone(), n4.clone())]),
        ];

        (StreetGraph::from_source(records).unwrap(), [n0, n1, n2, n3, n4])
    }
}

// ── CoordinateMap ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod coord_map {
    use super::helpers::c;
    use crate::{CoordinateMap, Hashable, DEFAULT_MAX_LOAD_FACTOR};

    #[test]
    fn find_after_associate() {
        let mut m: CoordinateMap<String, f64> = CoordinateMap::new();
        assert!(m.is_empty());
        m.associate("Carey".into(), 3.5);
        assert_eq!(m.find(&"Carey".to_string()), Some(&3.5));
        assert_eq!(m.size(), 1);
        assert!(m.find(&"Linda".to_string()).is_none());
    }

    #[test]
    fn overwrite_keeps_size() {
        let mut m: CoordinateMap<u32, &str> = CoordinateMap::new();
        m.associate(1, "one");
        m.associate(2, "two");
        m.associate(1, "uno");
        assert_eq!(m.size(), 2);
        assert_eq!(m.find(&1), Some(&"uno"));
    }

    #[test]
    fn find_mut_updates_in_place() {
        let mut m: CoordinateMap<String, f64> = CoordinateMap::new();
        m.associate("David".into(), 3.99);
        if let Some(gpa) = m.find_mut(&"David".to_string()) {
            *gpa = 1.5;
        }
        assert_eq!(m.find(&"David".to_string()), Some(&1.5));
        assert!(m.find_mut(&"Linda".to_string()).is_none());
    }

    #[test]
    fn grows_when_load_factor_exceeded() {
        let mut m: CoordinateMap<u32, u32> = CoordinateMap::new();
        assert_eq!(m.bucket_count(), 8);
        for k in 0..4 {
            m.associate(k, k);
        }
        // 4 / 8 = 0.5 is not *above* the maximum.
        assert_eq!(m.bucket_count(), 8);
        m.associate(4, 4);
        assert_eq!(m.bucket_count(), 16);
    }

    #[test]
    fn overwrite_never_grows() {
        let mut m: CoordinateMap<u32, u32> = CoordinateMap::new();
        for k in 0..4 {
            m.associate(k, k);
        }
        for _ in 0..10 {
            m.associate(3, 99);
        }
        assert_eq!(m.bucket_count(), 8);
        assert_eq!(m.size(), 4);
    }

    #[test]
    fn rehash_keeps_every_pair() {
        let mut m: CoordinateMap<u32, u32> = CoordinateMap::new();
        for k in 0..1_000 {
            m.associate(k, k * 7);
        }
        assert_eq!(m.size(), 1_000);
        assert!(m.bucket_count().is_power_of_two());
        assert!(m.load_factor() <= DEFAULT_MAX_LOAD_FACTOR);
        for k in 0..1_000 {
            assert_eq!(m.find(&k), Some(&(k * 7)), "lost key {k}");
        }
    }

    #[test]
    fn rehash_keeps_coordinate_keys() {
        let mut m: CoordinateMap<_, usize> = CoordinateMap::with_max_load_factor(0.3);
        let coords: Vec<_> = (0..200)
            .map(|i| c(&format!("34.{i:04}"), &format!("-118.{:04}", 200 - i)))
            .collect();
        for (i, coord) in coords.iter().enumerate() {
            m.associate(coord.clone(), i);
        }
        assert_eq!(m.size(), 200);
        for (i, coord) in coords.iter().enumerate() {
            assert_eq!(m.find(coord), Some(&i));
        }
    }

    #[test]
    fn textual_identity_for_coordinates() {
        let mut m = CoordinateMap::new();
        m.associate(c("34.10", "-118.2"), "padded");
        m.associate(c("34.1", "-118.2"), "short");
        assert_eq!(m.size(), 2);
        assert_eq!(m.find(&c("34.10", "-118.2")), Some(&"padded"));
        assert_eq!(c("34.1", "-118.2").hash_key(), c("34.1", "-118.2").hash_key());
    }

    #[test]
    fn custom_load_factor() {
        let mut m: CoordinateMap<String, f64> = CoordinateMap::with_max_load_factor(0.3);
        m.associate("Carey".into(), 3.5);
        m.associate("David".into(), 3.99);
        assert_eq!(m.bucket_count(), 8);
        m.associate("Abe".into(), 3.2);
        assert_eq!(m.bucket_count(), 16);
    }

    #[test]
    fn invalid_load_factor_falls_back() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let m: CoordinateMap<u32, u32> = CoordinateMap::with_max_load_factor(bad);
            assert_eq!(m.max_load_factor(), DEFAULT_MAX_LOAD_FACTOR);
        }
    }

    #[test]
    fn reset_empties_and_shrinks() {
        let mut m: CoordinateMap<u32, u32> = CoordinateMap::with_max_load_factor(0.75);
        for k in 0..100 {
            m.associate(k, k);
        }
        m.reset();
        assert_eq!(m.size(), 0);
        assert_eq!(m.bucket_count(), 8);
        assert_eq!(m.max_load_factor(), 0.75);
        assert!(m.find(&5).is_none());
        m.associate(5, 50);
        assert_eq!(m.find(&5), Some(&50));
    }

    #[test]
    fn iter_visits_every_entry_once() {
        let mut m: CoordinateMap<u32, u32> = CoordinateMap::new();
        for k in 0..37 {
            m.associate(k, k + 100);
        }
        let it = m.iter();
        assert_eq!(it.len(), 37);
        let mut keys: Vec<u32> = m.iter().map(|(k, v)| {
            assert_eq!(*v, *k + 100);
            *k
        }).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..37).collect::<Vec<_>>());
    }

    /// Every key lands in one bucket; chains must still resolve by equality.
    #[derive(PartialEq, Eq)]
    struct Clash(u32);

    impl Hashable for Clash {
        fn hash_key(&self) -> u64 {
            42
        }
    }

    #[test]
    fn collisions_resolved_by_equality() {
        let mut m = CoordinateMap::new();
        for k in 0..500 {
            m.associate(Clash(k), k);
        }
        m.associate(Clash(250), 0);
        assert_eq!(m.size(), 500);
        assert_eq!(m.find(&Clash(250)), Some(&0));
        assert_eq!(m.find(&Clash(499)), Some(&499));
        assert!(m.find(&Clash(500)).is_none());
    }
}

// ── StreetGraph & sources ─────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use std::io::{Cursor, Write};

    use super::helpers::{c, grid_graph};
    use crate::{CsvSource, SpatialError, StreetGraph, StreetGraphBuilder, StreetRecord};

    #[test]
    fn empty_graph() {
        let g = StreetGraph::empty();
        assert!(g.is_empty());
        assert_eq!(g.coordinate_count(), 0);
        assert!(g.segments_from(&c("0", "0")).is_none());
        assert!(g.nearest_coordinate(0.0, 0.0).is_none());
    }

    #[test]
    fn both_directions_stored() {
        let (g, [n0, n1, n2, n3, n4]) = grid_graph();
        assert_eq!(g.coordinate_count(), 5);
        assert_eq!(g.segment_count(), 10);

        let from_n1 = g.segments_from(&n1).unwrap();
        assert_eq!(from_n1.len(), 2);
        assert!(from_n1.iter().all(|s| s.start == n1 && s.street == "A St"));
        assert!(from_n1.iter().any(|s| s.end == n0));
        assert!(from_n1.iter().any(|s| s.end == n2));

        // Reverse of "C St" 2→4 lives under 4.
        assert!(g.segments_from(&n4).unwrap().iter().any(|s| s.end == n2 && s.street == "C St"));
        assert_eq!(g.segments_from(&n3).unwrap().len(), 2);
    }

    #[test]
    fn every_endpoint_is_a_key() {
        let (g, _) = grid_graph();
        for coord in g.coordinates() {
            for seg in g.segments_from(coord).unwrap() {
                assert!(g.contains(&seg.end), "{} has no outgoing segments", seg.end);
            }
        }
    }

    #[test]
    fn unknown_coordinate_not_found() {
        let (g, _) = grid_graph();
        assert!(g.segments_from(&c("0.000", "0.00")).is_none()); // text differs
        assert!(!g.contains(&c("5", "5")));
    }

    #[test]
    fn shared_intersection_collects_all_streets() {
        let mut b = StreetGraphBuilder::new();
        let mid = c("1.0", "1.0");
        b.add_street("Main St", c("1.0", "0.9"), mid.clone());
        b.add_street("Main St", mid.clone(), c("1.0", "1.1"));
        b.add_street("Cross Rd", mid.clone(), c("1.1", "1.0"));
        let g = b.build();
        let streets: Vec<&str> = g.segments_from(&mid).unwrap().iter().map(|s| s.street.as_str()).collect();
        assert_eq!(streets, vec!["Main St", "Main St", "Cross Rd"]);
    }

    #[test]
    fn directed_only_segment() {
        let mut b = StreetGraphBuilder::new();
        let a = c("0", "0");
        let z = c("0", "1");
        b.add_directed_segment(crate::Segment::new(a.clone(), z.clone(), "One Way"));
        let g = b.build();
        assert_eq!(g.segment_count(), 1);
        assert!(g.contains(&a));
        assert!(!g.contains(&z));
    }

    #[test]
    fn blank_street_name_is_load_failure() {
        let records = vec![StreetRecord::new("  ", vec![(c("0", "0"), c("0", "1"))])];
        assert!(matches!(StreetGraph::from_source(records), Err(SpatialError::LoadFailure(_))));
    }

    #[test]
    fn failed_load_keeps_previous_graph() {
        let (mut g, [n0, ..]) = grid_graph();
        let bad = vec![
            StreetRecord::new("Fine St", vec![(c("9", "9"), c("9", "9.1"))]),
            StreetRecord::new("", vec![(c("8", "8"), c("8", "8.1"))]),
        ];
        assert!(g.load(bad).is_err());
        assert_eq!(g.coordinate_count(), 5);
        assert!(g.contains(&n0));
        assert!(!g.contains(&c("9", "9")));
    }

    #[test]
    fn successful_load_replaces_graph() {
        let (mut g, [n0, ..]) = grid_graph();
        g.load(vec![StreetRecord::new("New St", vec![(c("9", "9"), c("9", "9.1"))])]).unwrap();
        assert_eq!(g.coordinate_count(), 2);
        assert!(!g.contains(&n0));
        assert!(g.contains(&c("9", "9.1")));
    }

    #[test]
    fn nearest_coordinate_snaps() {
        let (g, [n0, n1, ..]) = grid_graph();
        assert_eq!(g.nearest_coordinate(0.0, 0.0), Some(&n0));
        assert_eq!(g.nearest_coordinate(0.0, 0.004), Some(&n0));
        assert_eq!(g.nearest_coordinate(0.001, 0.009), Some(&n1));
    }

    const CSV: &str = "\
Westwood Blvd, 34.0600, -118.4400, 34.0610, -118.4400
Westwood Blvd, 34.0610, -118.4400, 34.0620, -118.4400
Le Conte Ave,  34.0610, -118.4400, 34.0610, -118.4410
";

    #[test]
    fn csv_groups_consecutive_rows() {
        use crate::GraphSource;
        let records = CsvSource::from_reader(Cursor::new(CSV)).into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Westwood Blvd");
        assert_eq!(records[0].segments.len(), 2);
        assert_eq!(records[1].name, "Le Conte Ave");
        assert_eq!(records[1].segments[0].1, c("34.0610", "-118.4410"));
    }

    #[test]
    fn csv_loads_into_graph() {
        let g = StreetGraph::from_source(CsvSource::from_reader(Cursor::new(CSV))).unwrap();
        assert_eq!(g.coordinate_count(), 4);
        assert_eq!(g.segment_count(), 6);
        assert_eq!(g.segments_from(&c("34.0610", "-118.4400")).unwrap().len(), 3);
    }

    #[test]
    fn csv_wrong_column_count_fails() {
        let bad = "Main St,1.0,2.0,1.1\n";
        let result = StreetGraph::from_source(CsvSource::from_reader(Cursor::new(bad)));
        assert!(matches!(result, Err(SpatialError::LoadFailure(_))));
    }

    #[test]
    fn csv_bad_coordinate_names_row() {
        let bad = "Main St,1.0,2.0,1.1,2.0\nMain St,1.1,2.0,north,2.0\n";
        match StreetGraph::from_source(CsvSource::from_reader(Cursor::new(bad))) {
            Err(SpatialError::LoadFailure(msg)) => assert!(msg.contains("row 2"), "got {msg}"),
            other => panic!("expected LoadFailure, got {:?}", other.map(|g| g.coordinate_count())),
        }
    }

    #[test]
    fn csv_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvSource::open(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(SpatialError::LoadFailure(_))));
    }

    #[test]
    fn csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let g = StreetGraph::from_source(CsvSource::open(file.path()).unwrap()).unwrap();
        assert_eq!(g.coordinate_count(), 4);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::{c, grid_graph};
    use crate::{AStarRouter, DijkstraRouter, Router, SpatialError, StreetGraph, StreetRecord};

    #[test]
    fn trivial_same_coordinate() {
        let (g, [n0, ..]) = grid_graph();
        let r = AStarRouter.route(&g, &n0, &n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.distance_km, 0.0);
        assert_eq!(r.distance_miles(), 0.0);
    }

    #[test]
    fn bad_coordinate_checked_first() {
        let (g, [n0, ..]) = grid_graph();
        let nowhere = c("45", "45");
        match AStarRouter.route(&g, &nowhere, &n0) {
            Err(SpatialError::BadCoordinate(bad)) => assert_eq!(bad, nowhere),
            other => panic!("expected BadCoordinate, got {other:?}"),
        }
        match AStarRouter.route(&g, &n0, &nowhere) {
            Err(SpatialError::BadCoordinate(bad)) => assert_eq!(bad, nowhere),
            other => panic!("expected BadCoordinate, got {other:?}"),
        }
        // Unknown start == end is still a bad coordinate, not a trivial route.
        assert!(matches!(
            AStarRouter.route(&g, &nowhere, &nowhere),
            Err(SpatialError::BadCoordinate(_))
        ));
    }

    #[test]
    fn shortest_path_correct() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let route = AStarRouter.route(&g, &n0, &n4).unwrap();

        assert_eq!(route.segments.len(), 3);
        assert_eq!(route.segments[0].start, n0);
        assert_eq!(route.segments[0].end, n1);
        assert_eq!(route.segments[1].end, n2);
        assert_eq!(route.segments[2].end, n4);
        assert_eq!(route.streets(), vec!["A St", "C St"]);
    }

    #[test]
    fn segments_chain_and_total_matches() {
        let (g, nodes) = grid_graph();
        for from in &nodes {
            for to in &nodes {
                let route = AStarRouter.route(&g, from, to).unwrap();
                for pair in route.segments.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                if let (Some(first), Some(last)) = (route.segments.first(), route.segments.last()) {
                    assert_eq!(&first.start, from);
                    assert_eq!(&last.end, to);
                }
                let summed: f64 = route.segments.iter().map(|s| s.length_km()).sum();
                assert!((summed - route.distance_km).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn astar_matches_dijkstra() {
        let (g, nodes) = grid_graph();
        for from in &nodes {
            for to in &nodes {
                let a = AStarRouter.route(&g, from, to).unwrap();
                let d = DijkstraRouter.route(&g, from, to).unwrap();
                assert!((a.distance_km - d.distance_km).abs() < 1e-9, "{from} → {to}");
            }
        }
    }

    #[test]
    fn hand_computed_mileage() {
        let (g, [n0, n1, n2, _, n4]) = grid_graph();
        let route = AStarRouter.route(&g, &n0, &n4).unwrap();
        let expected_km = n0.distance_km(&n1) + n1.distance_km(&n2) + n2.distance_km(&n4);
        assert!((route.distance_km - expected_km).abs() < 1e-9);
        // 0.03° of arc ≈ 3.336 km ≈ 2.073 mi
        assert!((route.distance_miles() - 2.073).abs() < 0.01, "got {}", route.distance_miles());
    }

    #[test]
    fn no_route_between_disconnected_streets() {
        let a = c("0", "0");
        let b = c("0", "0.01");
        let y = c("1", "1");
        let z = c("1", "1.01");
        let g = StreetGraph::from_source(vec![
            StreetRecord::new("West St", vec![(a.clone(), b)]),
            StreetRecord::new("East St", vec![(y, z.clone())]),
        ])
        .unwrap();

        match AStarRouter.route(&g, &a, &z) {
            Err(SpatialError::NoRoute { from, to }) => {
                assert_eq!(from, a);
                assert_eq!(to, z);
            }
            other => panic!("expected NoRoute, got {other:?}"),
        }
    }

    #[test]
    fn one_way_blocks_return() {
        use crate::{Segment, StreetGraphBuilder};

        // Slow Rd detours through b, so Fast Ln is strictly shorter.
        let a = c("0", "0");
        let b = c("0.01", "0.01");
        let z = c("0", "0.02");
        let mut builder = StreetGraphBuilder::new();
        builder.add_directed_segment(Segment::new(a.clone(), z.clone(), "Fast Ln"));
        builder.add_street("Slow Rd", a.clone(), b.clone());
        builder.add_street("Slow Rd", b.clone(), z.clone());
        let g = builder.build();

        let there = AStarRouter.route(&g, &a, &z).unwrap();
        let back = AStarRouter.route(&g, &z, &a).unwrap();
        assert_eq!(there.streets(), vec!["Fast Ln"]);
        assert_eq!(back.streets(), vec!["Slow Rd"]);
        assert_eq!(back.segments.len(), 2);
    }

    #[test]
    fn graph_is_shareable_across_threads() {
        let (g, [n0, _, _, n3, n4]) = grid_graph();
        std::thread::scope(|s| {
            let a = s.spawn(|| AStarRouter.route(&g, &n0, &n4).unwrap().distance_km);
            let b = s.spawn(|| AStarRouter.route(&g, &n3, &n4).unwrap().distance_km);
            assert!(a.join().unwrap() > 0.0);
            assert!(b.join().unwrap() > 0.0);
        });
    }
}
