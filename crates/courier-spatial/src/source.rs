//! Graph data sources.
//!
//! The graph never reads files itself; it consumes [`StreetRecord`]s from
//! anything implementing [`GraphSource`].  Two sources ship with the crate:
//!
//! | Source               | Input                                         |
//! |----------------------|-----------------------------------------------|
//! | `Vec<StreetRecord>`  | records already in memory (tests, callers that parse their own format) |
//! | [`CsvSource`]        | headerless CSV, one segment per row           |
//!
//! # CSV format
//!
//! ```csv
//! Westwood Blvd,34.0600,-118.4400,34.0610,-118.4400
//! Westwood Blvd,34.0610,-118.4400,34.0620,-118.4400
//! Le Conte Ave,34.0610,-118.4400,34.0610,-118.4410
//! ```
//!
//! Columns: `street, start_lat, start_lon, end_lat, end_lon`.  Consecutive
//! rows with the same street name are grouped into one record.  Fields are
//! trimmed; the coordinate text after trimming is the node identity.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use courier_core::GeoCoord;

use crate::{SpatialError, SpatialResult};

// ── StreetRecord ──────────────────────────────────────────────────────────────

/// One named street and its segments as `(start, end)` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetRecord {
    pub name:     String,
    pub segments: Vec<(GeoCoord, GeoCoord)>,
}

impl StreetRecord {
    pub fn new(name: impl Into<String>, segments: Vec<(GeoCoord, GeoCoord)>) -> Self {
        Self { name: name.into(), segments }
    }
}

// ── GraphSource ───────────────────────────────────────────────────────────────

/// Supplier of street records for [`StreetGraph::load`](crate::StreetGraph::load).
///
/// Implementations report unreadable or malformed input as
/// [`SpatialError::LoadFailure`].
pub trait GraphSource {
    fn into_records(self) -> SpatialResult<Vec<StreetRecord>>;
}

impl GraphSource for Vec<StreetRecord> {
    fn into_records(self) -> SpatialResult<Vec<StreetRecord>> {
        Ok(self)
    }
}

// ── CsvSource ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SegmentRow(String, String, String, String, String);

/// Headerless CSV segment list (see the [module docs](self) for the format).
pub struct CsvSource<R: Read> {
    reader: R,
}

impl CsvSource<File> {
    /// Open a CSV file.  A missing or unreadable file is a `LoadFailure`.
    pub fn open(path: &Path) -> SpatialResult<Self> {
        let file = File::open(path).map_err(|e| {
            SpatialError::LoadFailure(format!("cannot open {}: {e}", path.display()))
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any `Read` source.
    ///
    /// Useful for testing (pass a `std::io::Cursor`) or for map data fetched
    /// over the network.
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> GraphSource for CsvSource<R> {
    fn into_records(self) -> SpatialResult<Vec<StreetRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(self.reader);

        let mut records: Vec<StreetRecord> = Vec::new();

        for (line, result) in csv_reader.deserialize::<SegmentRow>().enumerate() {
            let SegmentRow(street, start_lat, start_lon, end_lat, end_lon) =
                result.map_err(|e| SpatialError::LoadFailure(e.to_string()))?;

            let parse = |lat: &str, lon: &str| {
                GeoCoord::parse(lat, lon)
                    .map_err(|e| SpatialError::LoadFailure(format!("row {}: {e}", line + 1)))
            };
            let start = parse(&start_lat, &start_lon)?;
            let end = parse(&end_lat, &end_lon)?;

            match records.last_mut() {
                Some(last) if last.name == street => last.segments.push((start, end)),
                _ => records.push(StreetRecord::new(street, vec![(start, end)])),
            }
        }

        Ok(records)
    }
}
