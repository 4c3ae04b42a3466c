//! true-north - Vastu Shastra compass engine
//!
//! Turns device-orientation readings into a smoothly rotating compass dial
//! and, once the heading settles, a short Vastu Shastra reading from an LLM
//! prompt call. It is designed to be consumed by:
//! - The CLI binary (src/bin/true_north.rs)
//! - A browser front end via the `wasm` feature
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **core**: heading arithmetic, session state, event loop
//! - **vastu**: the prompt and the oracles that answer it
//! - **bin/true_north.rs**: thin wrapper that wires stdin or a simulated
//!   sweep into the event loop
//!
//! # Example
//!
//! ```
//! use true_north::{shortest_delta, Heading};
//!
//! let heading = Heading::new(-10.0).unwrap();
//! assert_eq!(heading.degrees(), 350.0);
//! assert_eq!(shortest_delta(350.0, 10.0), 20.0);
//! ```

pub mod core;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod vastu;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::core::{
    normalize, shortest_delta, CompassConfig, CompassError, DialRotation, Direction, Frame,
    Heading, InsightState, OrientationEvent, PermissionState, Result, SensorMessage, Session,
};
pub use vastu::{render_prompt, StaticOracle, VastuInsight, VastuOracle, VastuRequest};
#[cfg(not(target_arch = "wasm32"))]
pub use vastu::GeminiOracle;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version of the true-north library
pub fn version() -> &'static str {
    VERSION
}
