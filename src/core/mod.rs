//! Core module for the true-north compass engine
//!
//! # Architecture
//!
//! - `heading`: bearing normalization, shortest deltas, compass points
//! - `orientation`: sensor events and permission state
//! - `dial`: unwrapped dial rotation with jump detection
//! - `debounce`: quiet-period debouncer
//! - `session`: per-session state tying the stages together
//! - `display`: text/JSON frames
//! - `config`: `.true_north_config.json` loading
//! - `runtime`, `source`: tokio event loop and sensor sources (native only)
//! - `error`: error types using thiserror

pub mod config;
pub mod debounce;
pub mod dial;
pub mod display;
pub mod error;
pub mod heading;
pub mod orientation;
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod runtime;
#[cfg(not(target_arch = "wasm32"))]
pub mod source;

// Re-export commonly used types
pub use config::{CompassConfig, LlmConfig, DEFAULT_FALLBACK_MESSAGE};
pub use debounce::Debouncer;
pub use dial::{DialRotation, DialUpdate};
pub use display::{Frame, INSIGHT_PLACEHOLDER};
pub use error::{CompassError, Result, ResultExt};
pub use heading::{normalize, shortest_delta, Direction, Heading};
pub use orientation::{OrientationEvent, PermissionState, SensorMessage};
pub use session::{InsightState, PendingRequest, Session};
#[cfg(not(target_arch = "wasm32"))]
pub use source::Sweep;
