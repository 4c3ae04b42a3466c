//! Configuration loaded from `.true_north_config.json`
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::dial::DEFAULT_JUMP_THRESHOLD;
use crate::core::error::{CompassError, Result, ResultExt};

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".true_north_config.json";

/// Shown when the oracle cannot be reached
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Could not retrieve Vastu information at this time.";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompassConfig {
    /// Quiet period before a steady heading triggers a request
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Heading change (degrees) above which the dial snaps instead of turning
    #[serde(default = "default_jump_threshold")]
    pub jump_threshold_deg: f64,
    /// Text shown when the oracle fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    /// LLM endpoint settings
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_jump_threshold() -> f64 {
    DEFAULT_JUMP_THRESHOLD
}

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            jump_threshold_deg: default_jump_threshold(),
            fallback_message: default_fallback_message(),
            llm: LlmConfig::default(),
        }
    }
}

/// Settings for the generative-language endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variables searched, in order, for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> Vec<String> {
    vec!["GEMINI_API_KEY".to_string(), "GOOGLE_API_KEY".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// First non-empty API key among `api_key_env`
    pub fn api_key(&self) -> Result<String> {
        self.api_key_env
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| CompassError::MissingApiKey {
                vars: self.api_key_env.join(", "),
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CompassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CompassError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)
            .map_err(CompassError::from)
            .context(format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(CompassError::from)
            .context(format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config: explicit path, then the working directory, then
    /// the user config directory. Falls back to defaults when none exist.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        for candidate in Self::search_paths() {
            if candidate.exists() {
                log::debug!("loading config from {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Implicit config locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("true-north/config.json"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms == 0 {
            return Err(CompassError::invalid_config("debounce_ms must be positive"));
        }
        if !self.jump_threshold_deg.is_finite() || self.jump_threshold_deg <= 0.0 {
            return Err(CompassError::invalid_config(
                "jump_threshold_deg must be a positive number of degrees",
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(CompassError::invalid_config("llm.model must not be empty"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(CompassError::invalid_config("llm.timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Builder pattern: set debounce period
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Builder pattern: set model
    pub fn with_model(mut self, model: &str) -> Self {
        self.llm.model = model.to_string();
        self
    }

    /// Builder pattern: set endpoint base URL
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.llm.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Builder pattern: set fallback message
    pub fn with_fallback_message(mut self, message: &str) -> Self {
        self.fallback_message = message.to_string();
        self
    }
}
