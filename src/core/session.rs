//! Compass session state
//!
//! Sensor Input → Heading Normalizer → Dial Rotation → Debounced Info Fetch.
//! `Session` owns every piece of per-session state; the event loop in
//! `runtime` only moves time forward and carries futures.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::config::CompassConfig;
use crate::core::debounce::Debouncer;
use crate::core::dial::{DialRotation, DialUpdate};
use crate::core::display::Frame;
use crate::core::heading::Heading;
use crate::core::orientation::{OrientationEvent, PermissionState, SensorMessage};
use crate::vastu::{Consultation, VastuRequest};

/// Where the Vastu reading currently stands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InsightState {
    /// Nothing requested yet
    Idle,
    Loading { direction: Heading },
    Ready {
        direction: Heading,
        text: String,
        received_at: DateTime<Utc>,
    },
    /// Oracle failed; `text` is the fallback message
    Failed { direction: Heading, text: String },
}

impl InsightState {
    pub fn is_loading(&self) -> bool {
        matches!(self, InsightState::Loading { .. })
    }

    /// Displayable text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            InsightState::Ready { text, .. } | InsightState::Failed { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A request the event loop should send
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRequest {
    /// Sequence number; only the latest one is accepted back
    pub seq: u64,
    pub request: VastuRequest,
}

#[derive(Debug, Clone)]
pub struct Session {
    permission: PermissionState,
    heading: Option<Heading>,
    dial: DialRotation,
    last_dial: Option<DialUpdate>,
    debouncer: Debouncer<Heading>,
    insight: InsightState,
    next_seq: u64,
    awaiting: Option<u64>,
    fallback: String,
}

impl Session {
    pub fn new(config: &CompassConfig) -> Self {
        Self {
            permission: PermissionState::Prompt,
            heading: None,
            dial: DialRotation::new(config.jump_threshold_deg),
            last_dial: None,
            debouncer: Debouncer::new(config.debounce()),
            insight: InsightState::Idle,
            next_seq: 0,
            awaiting: None,
            fallback: config.fallback_message.clone(),
        }
    }

    /// Builder pattern: start with a permission outcome already applied
    pub fn with_permission(mut self, permission: PermissionState) -> Self {
        self.set_permission(permission, Instant::now());
        self
    }

    /// Apply one sensor message. Returns whether the visible state changed.
    pub fn on_message(&mut self, message: SensorMessage, now: Instant) -> bool {
        match message {
            SensorMessage::Permission { permission } => self.set_permission(permission, now),
            SensorMessage::Orientation(event) => self.on_orientation(event, now),
        }
    }

    /// Feed an orientation reading. Ignored unless the sensor is granted.
    pub fn on_orientation(&mut self, event: OrientationEvent, now: Instant) -> bool {
        if !self.permission.accepts_readings() {
            return false;
        }
        let Some(heading) = event.heading() else {
            return false;
        };
        if self.heading == Some(heading) {
            return false;
        }

        self.heading = Some(heading);
        self.last_dial = Some(self.dial.update(heading));
        if self.debouncer.push(heading, now) {
            log::debug!("heading {} armed, due in {:?}", heading, self.debouncer.quiet());
        }
        true
    }

    /// Apply a permission outcome. Leaving `Granted` cancels the pending
    /// timer and abandons any in-flight request. Returning to `Granted` with
    /// a known heading re-arms the timer from `now`.
    pub fn set_permission(&mut self, outcome: PermissionState, now: Instant) -> bool {
        let next = self.permission.transition(outcome);
        if next == self.permission {
            return false;
        }
        log::debug!("sensor permission {} -> {}", self.permission.label(), next.label());
        self.permission = next;

        if !next.accepts_readings() {
            self.debouncer.reset();
            if self.awaiting.take().is_some() {
                self.insight = InsightState::Idle;
            }
        } else if let Some(heading) = self.heading {
            if self.debouncer.push(heading, now) {
                log::debug!("heading {} re-armed after permission granted", heading);
            }
        }
        true
    }

    /// Take the debounced heading if its quiet period has elapsed
    pub fn due(&mut self, now: Instant) -> Option<PendingRequest> {
        if !self.permission.accepts_readings() {
            return None;
        }
        let heading = self.debouncer.poll(now)?;
        Some(self.begin_fetch(heading))
    }

    /// Start a request for `heading`, superseding any in flight
    pub fn begin_fetch(&mut self, heading: Heading) -> PendingRequest {
        self.next_seq += 1;
        let seq = self.next_seq;
        if let Some(stale) = self.awaiting.replace(seq) {
            log::debug!("request #{} superseded by #{}", stale, seq);
        }
        self.insight = InsightState::Loading { direction: heading };
        PendingRequest {
            seq,
            request: VastuRequest::new(heading),
        }
    }

    /// Record the outcome of request `seq`. Stale results are discarded.
    pub fn finish_fetch(&mut self, seq: u64, outcome: Consultation) -> bool {
        if self.awaiting != Some(seq) {
            log::debug!("discarding stale result for request #{}", seq);
            return false;
        }
        self.awaiting = None;

        let direction = match self.insight {
            InsightState::Loading { direction } => direction,
            _ => self.heading.unwrap_or_default(),
        };
        self.insight = match outcome {
            Consultation::Answered(insight) => InsightState::Ready {
                direction,
                text: insight.vastu_info,
                received_at: Utc::now(),
            },
            Consultation::Fallback(text) => InsightState::Failed { direction, text },
        };
        true
    }

    /// Whether a result for `seq` would still be accepted
    pub fn awaits(&self, seq: u64) -> bool {
        self.awaiting == Some(seq)
    }

    /// Next debounce deadline
    pub fn deadline(&self) -> Option<Instant> {
        if self.permission.accepts_readings() {
            self.debouncer.deadline()
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.deadline().is_some()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    pub fn dial(&self) -> Option<DialUpdate> {
        self.last_dial
    }

    pub fn insight(&self) -> &InsightState {
        &self.insight
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Display snapshot of the current state
    pub fn frame(&self) -> Frame {
        Frame::from_session(self)
    }
}
