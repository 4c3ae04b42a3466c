//! Orientation sensor input
//!
//! Mirrors the shape of a browser `deviceorientation` event: `alpha` is the
//! device's rotation about its z-axis (counter-clockwise), while iOS reports
//! an absolute `webkitCompassHeading` (clockwise from north) instead.

use serde::{Deserialize, Serialize};

use crate::core::heading::{Heading, FULL_TURN};

/// A single orientation reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationEvent {
    /// Rotation about the z-axis in degrees
    #[serde(default)]
    pub alpha: Option<f64>,
    /// Absolute compass heading (iOS)
    #[serde(default)]
    pub webkit_compass_heading: Option<f64>,
}

impl OrientationEvent {
    /// Event carrying only `alpha`
    pub fn from_alpha(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            webkit_compass_heading: None,
        }
    }

    /// Event carrying an absolute compass heading
    pub fn from_compass(heading: f64) -> Self {
        Self {
            alpha: None,
            webkit_compass_heading: Some(heading),
        }
    }

    /// Whole-degree heading for this event.
    ///
    /// `webkitCompassHeading` wins when present; otherwise the heading is
    /// `360 - alpha`. Returns `None` when neither field carries a finite value.
    pub fn heading(&self) -> Option<Heading> {
        let raw = match self.webkit_compass_heading.filter(|v| v.is_finite()) {
            Some(compass) => compass,
            None => FULL_TURN - self.alpha.filter(|v| v.is_finite())?,
        };
        Heading::new(raw).ok().map(Heading::to_whole_degree)
    }
}

/// Access state of the orientation sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Not yet asked
    #[default]
    Prompt,
    Granted,
    Denied,
    /// Platform has no orientation sensor
    Unsupported,
}

impl PermissionState {
    /// Only a granted sensor delivers readings
    pub fn accepts_readings(self) -> bool {
        self == PermissionState::Granted
    }

    /// Apply the outcome of a permission request.
    ///
    /// `Unsupported` is terminal; every other state takes the new outcome.
    pub fn transition(self, outcome: PermissionState) -> PermissionState {
        match self {
            PermissionState::Unsupported => PermissionState::Unsupported,
            _ => outcome,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermissionState::Prompt => "prompt",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Unsupported => "unsupported",
        }
    }
}

/// One message from the sensor source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorMessage {
    /// Permission outcome, e.g. `{"permission": "denied"}`
    Permission { permission: PermissionState },
    /// Orientation reading, e.g. `{"alpha": 12.5}`
    Orientation(OrientationEvent),
}

impl SensorMessage {
    /// Parse one JSON line from a sensor stream
    pub fn parse_line(line: &str) -> crate::core::error::Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

impl From<OrientationEvent> for SensorMessage {
    fn from(event: OrientationEvent) -> Self {
        SensorMessage::Orientation(event)
    }
}
