//! Heading arithmetic
//!
//! Bearings are degrees clockwise from north, wrapped into `[0, 360)`.
//! Everything downstream (dial rotation, debounced fetches, display) works
//! on a [`Heading`] so the wrap is applied exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{CompassError, Result};

/// Degrees in a full turn
pub const FULL_TURN: f64 = 360.0;

/// Wrap any finite bearing into `[0, 360)`.
pub fn normalize(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Signed delta in `(-180, 180]` that takes `from` to `to` along the shorter arc.
///
/// A half-turn is reported as `+180`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = normalize(to - from);
    if delta > FULL_TURN / 2.0 {
        delta - FULL_TURN
    } else {
        delta
    }
}

/// A compass bearing, always in `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Heading(f64);

impl Heading {
    /// North
    pub const NORTH: Heading = Heading(0.0);

    /// Create a heading from raw degrees, wrapping into `[0, 360)`.
    pub fn new(degrees: f64) -> Result<Self> {
        if !degrees.is_finite() {
            return Err(CompassError::InvalidHeading { value: degrees });
        }
        Ok(Self(normalize(degrees)))
    }

    /// Degrees in `[0, 360)`
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Whole-degree bearing in `0..360` (359.5 rounds to 0)
    pub fn rounded(self) -> u16 {
        normalize(self.0.round()) as u16
    }

    /// This heading snapped to a whole degree
    pub fn to_whole_degree(self) -> Self {
        Self(f64::from(self.rounded()))
    }

    /// Shortest signed delta from this heading to `other`
    pub fn delta_to(self, other: Heading) -> f64 {
        shortest_delta(self.0, other.0)
    }

    /// Compass point whose sector contains this heading
    pub fn direction(self) -> Direction {
        Direction::from_heading(self)
    }
}

impl TryFrom<f64> for Heading {
    type Error = CompassError;

    fn try_from(value: f64) -> Result<Self> {
        Heading::new(value)
    }
}

impl From<Heading> for f64 {
    fn from(heading: Heading) -> Self {
        heading.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.rounded())
    }
}

/// The eight compass points and their Vastu associations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Direction {
    /// All points, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::Northeast,
        Direction::East,
        Direction::Southeast,
        Direction::South,
        Direction::Southwest,
        Direction::West,
        Direction::Northwest,
    ];

    /// Width of each sector in degrees
    pub const SECTOR: f64 = 45.0;

    /// The point whose 45° sector (centred on its bearing) holds `heading`.
    pub fn from_heading(heading: Heading) -> Self {
        let index = ((heading.degrees() + Self::SECTOR / 2.0) / Self::SECTOR).floor() as usize;
        Self::ALL[index % Self::ALL.len()]
    }

    /// Centre bearing of this point
    pub fn bearing(self) -> f64 {
        let index = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        index as f64 * Self::SECTOR
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::Northeast => "Northeast",
            Direction::East => "East",
            Direction::Southeast => "Southeast",
            Direction::South => "South",
            Direction::Southwest => "Southwest",
            Direction::West => "West",
            Direction::Northwest => "Northwest",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::Northeast => "NE",
            Direction::East => "E",
            Direction::Southeast => "SE",
            Direction::South => "S",
            Direction::Southwest => "SW",
            Direction::West => "W",
            Direction::Northwest => "NW",
        }
    }

    /// What this direction represents in Vastu Shastra
    pub fn theme(self) -> &'static str {
        match self {
            Direction::North => "wealth and career",
            Direction::East => "social connections and overall well-being",
            Direction::South => "strength and fame",
            Direction::West => "peace and prosperity",
            Direction::Northeast => "spiritual growth and knowledge",
            Direction::Southeast => "passion and creativity",
            Direction::Southwest => "skills and stability",
            Direction::Northwest => "support and change",
        }
    }

    /// Parse a name or abbreviation, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name().to_lowercase() == lower || d.abbreviation().to_lowercase() == lower)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
