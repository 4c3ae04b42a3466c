//! Browser bindings
//!
//! Exposes the heading arithmetic to a JavaScript front end so the page and
//! the CLI share one implementation. The page keeps its own
//! `deviceorientation` listener and timer; these functions only do the math.

use wasm_bindgen::prelude::*;

use crate::core::dial::DialRotation;
use crate::core::heading::{self, Heading};
use crate::core::orientation::OrientationEvent;
use crate::vastu::render_prompt;

/// Wrap a bearing into `[0, 360)`. Non-finite input yields 0.
#[wasm_bindgen(js_name = normalizeHeading)]
pub fn normalize_heading(degrees: f64) -> f64 {
    Heading::new(degrees).map(Heading::degrees).unwrap_or(0.0)
}

/// Signed shortest delta in `(-180, 180]`
#[wasm_bindgen(js_name = shortestDelta)]
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    heading::shortest_delta(from, to)
}

/// Whole-degree heading from a `deviceorientation` event, or `undefined`
#[wasm_bindgen(js_name = headingFromOrientation)]
pub fn heading_from_orientation(alpha: Option<f64>, webkit_compass_heading: Option<f64>) -> Option<f64> {
    OrientationEvent {
        alpha,
        webkit_compass_heading,
    }
    .heading()
    .map(Heading::degrees)
}

/// Compass point name for a bearing
#[wasm_bindgen(js_name = directionName)]
pub fn direction_name(degrees: f64) -> String {
    Heading::new(degrees)
        .unwrap_or_default()
        .direction()
        .name()
        .to_string()
}

/// The Vastu prompt for a bearing
#[wasm_bindgen(js_name = renderVastuPrompt)]
pub fn render_vastu_prompt(degrees: f64) -> String {
    render_prompt(Heading::new(degrees).unwrap_or_default())
}

/// Dial state held by the page between events
#[wasm_bindgen(js_name = Dial)]
pub struct WasmDial {
    inner: DialRotation,
    last_jump: bool,
}

#[wasm_bindgen(js_class = Dial)]
impl WasmDial {
    #[wasm_bindgen(constructor)]
    pub fn new(jump_threshold: f64) -> WasmDial {
        WasmDial {
            inner: DialRotation::new(jump_threshold),
            last_jump: false,
        }
    }

    /// Advance to `degrees`; returns the CSS rotation for the dial
    pub fn update(&mut self, degrees: f64) -> f64 {
        match Heading::new(degrees) {
            Ok(heading) => {
                let update = self.inner.update(heading);
                self.last_jump = update.jump;
                update.rotation
            }
            Err(_) => self.inner.rotation(),
        }
    }

    /// Whether the last update should snap rather than animate
    #[wasm_bindgen(getter)]
    pub fn jump(&self) -> bool {
        self.last_jump
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
        self.last_jump = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading_handles_nan() {
        assert_eq!(normalize_heading(f64::NAN), 0.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
    }

    #[test]
    fn test_heading_from_orientation() {
        assert_eq!(heading_from_orientation(Some(90.0), None), Some(270.0));
        assert_eq!(heading_from_orientation(None, None), None);
    }

    #[test]
    fn test_dial_wrapper() {
        let mut dial = WasmDial::new(90.0);
        dial.update(350.0);
        assert!(dial.jump());
        assert_eq!(dial.update(10.0), -370.0);
        assert!(!dial.jump());
        assert_eq!(dial.update(f64::NAN), -370.0);
    }
}
