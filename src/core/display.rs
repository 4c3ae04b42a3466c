//! Display frames
//!
//! A `Frame` is what a front end needs to draw one update: the bearing
//! readout, the dial transform and the insight card. It renders as a short
//! text block for terminals and serializes as JSON for anything else.

use serde::Serialize;

use crate::core::dial::DialUpdate;
use crate::core::heading::{Direction, Heading};
use crate::core::orientation::PermissionState;
use crate::core::session::{InsightState, Session};

/// Shown before any reading has arrived
pub const INSIGHT_PLACEHOLDER: &str = "Point your device in a direction to get Vastu insights.";

/// Shown while a request is in flight
pub const INSIGHT_LOADING: &str = "Consulting...";

/// One display update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub permission: PermissionState,
    pub heading: Option<Heading>,
    pub direction: Option<Direction>,
    /// Bearing readout, `"0°"` when the heading is unknown
    pub bearing: String,
    pub dial: Option<DialUpdate>,
    pub insight: InsightState,
}

impl Frame {
    pub fn from_session(session: &Session) -> Self {
        let heading = session.heading();
        Self {
            permission: session.permission(),
            heading,
            direction: heading.map(Heading::direction),
            bearing: heading.unwrap_or_default().to_string(),
            dial: session.dial(),
            insight: session.insight().clone(),
        }
    }

    /// Text of the insight card
    pub fn insight_line(&self) -> &str {
        match &self.insight {
            InsightState::Idle => INSIGHT_PLACEHOLDER,
            InsightState::Loading { .. } => INSIGHT_LOADING,
            InsightState::Ready { text, .. } | InsightState::Failed { text, .. } => text.as_str(),
        }
    }

    /// Multi-line terminal rendering
    pub fn render_text(&self) -> String {
        match self.permission {
            PermissionState::Prompt => {
                return "Waiting for orientation sensor access.".to_string();
            }
            PermissionState::Denied => {
                return "Permission denied: orientation sensor access is disabled.".to_string();
            }
            PermissionState::Unsupported => {
                return "Sensor not supported: no orientation sensor available.".to_string();
            }
            PermissionState::Granted => {}
        }

        let direction = self
            .direction
            .map(|d| format!(" {}", d.abbreviation()))
            .unwrap_or_default();
        let dial = match self.dial {
            Some(update) if update.jump => format!("dial {:.0}° (snap)", update.rotation),
            Some(update) => format!("dial {:.0}°", update.rotation),
            None => "dial 0°".to_string(),
        };

        format!("{:>4}{}  [{}]\n  {}", self.bearing, direction, dial, self.insight_line())
    }

    /// Single-line JSON rendering
    pub fn render_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CompassConfig;
    use crate::core::orientation::OrientationEvent;
    use std::time::Instant;

    fn granted() -> Session {
        Session::new(&CompassConfig::default()).with_permission(PermissionState::Granted)
    }

    #[test]
    fn test_unknown_heading_reads_zero() {
        let frame = granted().frame();
        assert_eq!(frame.bearing, "0°");
        assert!(frame.direction.is_none());
        assert_eq!(frame.insight_line(), INSIGHT_PLACEHOLDER);
    }

    #[test]
    fn test_text_rendering() {
        let mut session = granted();
        session.on_orientation(OrientationEvent::from_compass(91.0), Instant::now());
        let text = session.frame().render_text();
        assert!(text.starts_with(" 91° E"));
        assert!(text.contains("dial -91° (snap)"));
        assert!(text.contains(INSIGHT_PLACEHOLDER));
    }

    #[test]
    fn test_loading_line() {
        let mut session = granted();
        session.begin_fetch(Heading::NORTH);
        assert_eq!(session.frame().insight_line(), INSIGHT_LOADING);
    }

    #[test]
    fn test_denied_rendering() {
        let session = granted().with_permission(PermissionState::Denied);
        assert!(session.frame().render_text().contains("Permission denied"));
    }

    #[test]
    fn test_json_rendering() {
        let mut session = granted();
        session.on_orientation(OrientationEvent::from_alpha(90.0), Instant::now());
        let json: serde_json::Value = serde_json::from_str(&session.frame().render_json().unwrap()).unwrap();
        assert_eq!(json["permission"], "granted");
        assert_eq!(json["heading"], 270.0);
        assert_eq!(json["direction"], "west");
        assert_eq!(json["bearing"], "270°");
        assert_eq!(json["insight"]["status"], "idle");
    }
}
