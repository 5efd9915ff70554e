//! Geographic coordinate type and great-circle utilities.
//!
//! A `GeoCoord` carries two views of the same point:
//!
//! - the **text** exactly as it appeared in the map data (`"34.0625329"`).
//!   Equality and hashing look only at the text;
//! - the parsed **degrees** (`f64`), used for distance and bearing math.
//!
//! Identity on the text means two segment endpoints written the same way
//! always land on the same graph node, and float round-off can never merge
//! two distinct nodes or split one node in two.
//!
//! # Angles
//!
//! Bearings follow the map-data convention: degrees counter-clockwise from
//! **east**, normalised into `[0, 360)`.  Due north is 90°, west 180°.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{CoreError, CoreResult};

/// Mean Earth radius used by the haversine formula, kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Kilometres in one statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

// ── GeoCoord ──────────────────────────────────────────────────────────────────

/// A WGS-84 coordinate identified by its textual latitude/longitude.
///
/// Immutable once constructed.  Cloning is cheap: the text is shared.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CoordText", into = "CoordText")
)]
pub struct GeoCoord {
    lat_text: Arc<str>,
    lon_text: Arc<str>,
    lat: f64,
    lon: f64,
}

impl GeoCoord {
    /// Parse a coordinate from its textual latitude and longitude.
    ///
    /// Surrounding whitespace is trimmed and is not part of the identity.
    /// Fails if either value is not a finite number or lies outside
    /// `[-90, 90]` / `[-180, 180]`.
    pub fn parse(lat: &str, lon: &str) -> CoreResult<Self> {
        let lat_text = lat.trim();
        let lon_text = lon.trim();

        let lat_deg = parse_degrees(lat_text, 90.0, lat_text, lon_text)?;
        let lon_deg = parse_degrees(lon_text, 180.0, lat_text, lon_text)?;

        Ok(Self {
            lat_text: Arc::from(lat_text),
            lon_text: Arc::from(lon_text),
            lat: lat_deg,
            lon: lon_deg,
        })
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude exactly as written in the source data.
    #[inline]
    pub fn lat_text(&self) -> &str {
        &self.lat_text
    }

    /// Longitude exactly as written in the source data.
    #[inline]
    pub fn lon_text(&self) -> &str {
        &self.lon_text
    }

    /// Haversine great-circle distance in kilometres.
    ///
    /// Never overestimates the length of any street path between the two
    /// points, so it is admissible as an A* heuristic.
    pub fn distance_km(&self, other: &GeoCoord) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let u = ((lat2 - lat1) * 0.5).sin();
        let v = ((other.lon - self.lon).to_radians() * 0.5).sin();

        2.0 * EARTH_RADIUS_KM * (u * u + lat1.cos() * lat2.cos() * v * v).sqrt().asin()
    }

    /// Great-circle distance in statute miles.
    #[inline]
    pub fn distance_miles(&self, other: &GeoCoord) -> f64 {
        self.distance_km(other) / KM_PER_MILE
    }

    /// Bearing of the straight line from `self` to `other`, in degrees
    /// counter-clockwise from east, in `[0, 360)`.
    ///
    /// Computed on raw degree deltas (a planar approximation), which is what
    /// turn-by-turn classification needs at street scale.
    pub fn bearing_to(&self, other: &GeoCoord) -> f64 {
        let angle = (other.lat - self.lat).atan2(other.lon - self.lon).to_degrees();
        normalize_degrees(angle)
    }
}

/// Angle swept when turning from a line with bearing `from` onto a line with
/// bearing `to`: `to - from`, normalised into `[0, 360)`.
///
/// Small values are gentle left turns, values just under 360 gentle right
/// turns; 0 means straight on.
#[inline]
pub fn turn_angle(from: f64, to: f64) -> f64 {
    normalize_degrees(to - from)
}

/// Wrap any angle into `[0, 360)`.
///
/// `rem_euclid` can round up to exactly 360 for tiny negative inputs, hence
/// the explicit fold back to 0.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn parse_degrees(value: &str, limit: f64, lat: &str, lon: &str) -> CoreResult<f64> {
    let invalid = |reason: String| CoreError::InvalidCoordinate {
        lat: lat.to_owned(),
        lon: lon.to_owned(),
        reason,
    };

    let deg: f64 = value
        .parse()
        .map_err(|_| invalid(format!("`{value}` is not a number")))?;
    if !deg.is_finite() || deg.abs() > limit {
        return Err(invalid(format!("{value} is outside ±{limit}°")));
    }
    Ok(deg)
}

// ── Identity ──────────────────────────────────────────────────────────────────

impl PartialEq for GeoCoord {
    fn eq(&self, other: &Self) -> bool {
        self.lat_text == other.lat_text && self.lon_text == other.lon_text
    }
}

impl Eq for GeoCoord {}

impl Hash for GeoCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat_text.hash(state);
        self.lon_text.hash(state);
    }
}

impl fmt::Display for GeoCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat_text, self.lon_text)
    }
}

// ── serde ─────────────────────────────────────────────────────────────────────

/// Wire form of a [`GeoCoord`]: just the text.  Degrees are re-derived (and
/// re-validated) on deserialisation.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CoordText {
    lat: String,
    lon: String,
}

#[cfg(feature = "serde")]
impl TryFrom<CoordText> for GeoCoord {
    type Error = CoreError;

    fn try_from(raw: CoordText) -> CoreResult<Self> {
        GeoCoord::parse(&raw.lat, &raw.lon)
    }
}

#[cfg(feature = "serde")]
impl From<GeoCoord> for CoordText {
    fn from(coord: GeoCoord) -> Self {
        CoordText {
            lat: coord.lat_text.to_string(),
            lon: coord.lon_text.to_string(),
        }
    }
}
