//! Error types for true-north
//!
//! This module provides structured error handling using thiserror.

use thiserror::Error;
use std::path::PathBuf;

/// Result type alias for compass operations
pub type Result<T> = std::result::Result<T, CompassError>;

/// Errors that can occur while tracking a heading or consulting the oracle
#[derive(Error, Debug)]
pub enum CompassError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport error talking to the LLM endpoint
    #[cfg(not(target_arch = "wasm32"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// LLM endpoint answered with a non-success status
    #[error("LLM endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// LLM endpoint answered without any usable text
    #[error("LLM endpoint returned no content")]
    EmptyResponse,

    /// No API key in the configured environment variables
    #[error("No API key found (checked {vars})")]
    MissingApiKey { vars: String },

    /// Config file not found
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Heading value that cannot be normalized
    #[error("Invalid heading: {value}")]
    InvalidHeading { value: f64 },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CompassError>,
    },
}

impl CompassError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CompassError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CompassError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_context() {
        let err = CompassError::invalid_config("bad value");
        let wrapped = err.with_context("loading config");
        assert!(wrapped.to_string().contains("loading config"));
        assert!(wrapped.to_string().contains("bad value"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CompassError = io_err.into();
        assert!(matches!(err, CompassError::Io(_)));
    }

    #[test]
    fn test_api_error_display() {
        let err = CompassError::Api {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_missing_api_key_lists_vars() {
        let err = CompassError::MissingApiKey {
            vars: "GEMINI_API_KEY, GOOGLE_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_invalid_heading_display() {
        let err = CompassError::InvalidHeading { value: f64::NAN };
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(CompassError::EmptyResponse);
        let err = result.context("consulting oracle").unwrap_err();
        assert!(err.to_string().starts_with("consulting oracle"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: CompassError = json_err.into();
        assert!(matches!(err, CompassError::Json(_)));
    }
}
