//! Quiet-period debouncer
//!
//! Holds the most recent value until no new value has arrived for the quiet
//! period. Time is passed in by the caller, so the same state machine drives
//! the tokio event loop and plain unit tests.

use std::time::{Duration, Instant};

/// Default quiet period before a heading triggers a request
pub const DEFAULT_QUIET: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
    last_seen: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_seen: None,
        }
    }

    /// Record a new value, re-arming the timer.
    ///
    /// A value equal to the last one pushed is ignored and the existing
    /// deadline (if any) is kept. Returns whether the timer was (re)armed.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        if self.last_seen.as_ref() == Some(&value) {
            return false;
        }
        self.last_seen = Some(value.clone());
        self.pending = Some((value, now + self.quiet));
        true
    }

    /// Take the pending value if its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Clear the pending timer. The last seen value is kept, so pushing it
    /// again does not re-arm.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Clear the timer and forget the last seen value
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_seen = None;
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

impl<T: Clone + PartialEq> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET)
    }
}
