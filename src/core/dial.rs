//! Compass dial rotation
//!
//! The dial is drawn rotated by `-heading`. Feeding raw headings to a
//! renderer makes it spin the long way round whenever the bearing crosses
//! north (359° → 1°). `DialRotation` keeps an unbounded angle instead and
//! advances it by the shortest delta, so 359° → 1° is a 2° turn.

use serde::Serialize;

use crate::core::heading::Heading;

/// Default delta above which a change is treated as a jump
pub const DEFAULT_JUMP_THRESHOLD: f64 = 90.0;

/// Result of feeding one heading to the dial
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DialUpdate {
    /// Rotation to apply to the dial, in degrees (`-cumulative`)
    pub rotation: f64,
    /// Signed shortest delta from the previous heading
    pub delta: f64,
    /// Delta exceeded the jump threshold; renderers should snap, not animate
    pub jump: bool,
    /// Heading crossed north on this step
    pub crossed_north: bool,
}

/// Unwrapped dial angle that always turns along the shortest path
#[derive(Debug, Clone)]
pub struct DialRotation {
    cumulative: f64,
    last: Option<Heading>,
    jump_threshold: f64,
}

impl Default for DialRotation {
    fn default() -> Self {
        Self::new(DEFAULT_JUMP_THRESHOLD)
    }
}

impl DialRotation {
    pub fn new(jump_threshold: f64) -> Self {
        Self {
            cumulative: 0.0,
            last: None,
            jump_threshold: jump_threshold.abs(),
        }
    }

    /// Advance the dial to `heading`.
    ///
    /// The first heading after construction or `reset` places the dial
    /// directly; it reports a zero delta and counts as a jump.
    pub fn update(&mut self, heading: Heading) -> DialUpdate {
        let Some(previous) = self.last.replace(heading) else {
            self.cumulative = heading.degrees();
            return DialUpdate {
                rotation: -self.cumulative,
                delta: 0.0,
                jump: true,
                crossed_north: false,
            };
        };

        let delta = previous.delta_to(heading);
        let unwrapped = previous.degrees() + delta;
        self.cumulative += delta;

        DialUpdate {
            rotation: -self.cumulative,
            delta,
            jump: delta.abs() > self.jump_threshold,
            crossed_north: !(0.0..360.0).contains(&unwrapped),
        }
    }

    /// Current dial rotation in degrees
    pub fn rotation(&self) -> f64 {
        -self.cumulative
    }

    /// Unbounded heading (sum of all deltas)
    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    pub fn last_heading(&self) -> Option<Heading> {
        self.last
    }

    pub fn jump_threshold(&self) -> f64 {
        self.jump_threshold
    }

    /// Forget the previous heading and return to north
    pub fn reset(&mut self) {
        self.cumulative = 0.0;
        self.last = None;
    }
}
