//! Navigation commands emitted by the plan compiler.

use std::fmt;

use courier_core::geo::normalize_degrees;

// ── Direction ─────────────────────────────────────────────────────────────────

/// Compass octant of a segment's bearing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    East,
    Northeast,
    North,
    Northwest,
    West,
    Southwest,
    South,
    Southeast,
}

impl Direction {
    /// Classify a bearing (degrees counter-clockwise from east).
    ///
    /// Bins are 45° wide and half-open, each centred on its direction:
    ///
    /// | Bearing            | Direction  |
    /// |--------------------|------------|
    /// | `[0, 22.5)`        | east       |
    /// | `[22.5, 67.5)`     | northeast  |
    /// | `[67.5, 112.5)`    | north      |
    /// | `[112.5, 157.5)`   | northwest  |
    /// | `[157.5, 202.5)`   | west       |
    /// | `[202.5, 247.5)`   | southwest  |
    /// | `[247.5, 292.5)`   | south      |
    /// | `[292.5, 337.5)`   | southeast  |
    /// | `[337.5, 360)`     | east       |
    ///
    /// Bearings outside `[0, 360)` are wrapped first.
    pub fn from_bearing(bearing: f64) -> Direction {
        match normalize_degrees(bearing) {
            b if b < 22.5 => Direction::East,
            b if b < 67.5 => Direction::Northeast,
            b if b < 112.5 => Direction::North,
            b if b < 157.5 => Direction::Northwest,
            b if b < 202.5 => Direction::West,
            b if b < 247.5 => Direction::Southwest,
            b if b < 292.5 => Direction::South,
            b if b < 337.5 => Direction::Southeast,
            _ => Direction::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::East      => "east",
            Direction::Northeast => "northeast",
            Direction::North     => "north",
            Direction::Northwest => "northwest",
            Direction::West      => "west",
            Direction::Southwest => "southwest",
            Direction::South     => "south",
            Direction::Southeast => "southeast",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TurnSide ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TurnSide {
    Left,
    Right,
}

impl TurnSide {
    /// Classify the angle between two consecutive segments.
    ///
    /// `[1, 180)` is a left turn and `[180, 359]` a right turn.  A bend of
    /// less than 1° either way (including exactly 0°) is straight on and
    /// yields `None`.
    pub fn from_turn_angle(angle: f64) -> Option<TurnSide> {
        if (1.0..180.0).contains(&angle) {
            Some(TurnSide::Left)
        } else if (180.0..=359.0).contains(&angle) {
            Some(TurnSide::Right)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnSide::Left  => "left",
            TurnSide::Right => "right",
        }
    }
}

impl fmt::Display for TurnSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// One turn-by-turn instruction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Command {
    /// Drive `distance_miles` along `street` heading `direction`.
    Proceed {
        direction:      Direction,
        street:         String,
        distance_miles: f64,
    },
    /// Turn onto `street`.
    Turn { side: TurnSide, street: String },
    /// Hand over `item` at the current location.
    Deliver { item: String },
}

impl Command {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Command::Proceed { .. })
    }

    pub fn is_deliver(&self) -> bool {
        matches!(self, Command::Deliver { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Proceed { direction, street, distance_miles } => {
                write!(f, "Proceed {distance_miles:.2} miles {direction} on {street}")
            }
            Command::Turn { side, street } => write!(f, "Turn {side} on {street}"),
            Command::Deliver { item } => write!(f, "Deliver {item}"),
        }
    }
}
