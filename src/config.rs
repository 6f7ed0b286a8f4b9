//! System configuration parameters
//!
//! Supplied once at startup (defaults, optional JSON file, then command
//! line) and immutable for the life of the process.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default alarm threshold in centimetres.
pub const DEFAULT_THRESHOLD_CM: f32 = 30.0;
/// Default delay between measurement cycles in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 500;
/// Default detection log, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "intruder_log.txt";

/// Core alarm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Distance (cm) below which an object counts as an intruder
    pub threshold_cm: f32,
    /// Delay between measurement cycles (milliseconds)
    pub poll_interval_ms: u32,
    /// Append-only detection log
    pub log_path: PathBuf,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_cm: DEFAULT_THRESHOLD_CM,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl AlertConfig {
    /// Load a JSON config file.  Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// The effective configuration as JSON, in the format [`load`](Self::load) reads.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Corrupted)
    }

    /// Reject values the polling loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold_cm.is_finite() || self.threshold_cm <= 0.0 {
            return Err(ConfigError::ValidationFailed("threshold_cm must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        Ok(())
    }

    /// Apply a positional threshold argument.  Anything that is not a
    /// positive number keeps the current value.
    pub fn apply_threshold_arg(&mut self, arg: Option<&str>) {
        let Some(raw) = arg else { return };
        match raw.trim().parse::<f32>() {
            Ok(v) if v.is_finite() && v > 0.0 => self.threshold_cm = v,
            _ => warn!(
                "Ignoring threshold '{}', keeping {:.2} cm",
                raw, self.threshold_cm
            ),
        }
    }

    /// Apply a positional poll-interval argument (milliseconds).
    pub fn apply_interval_arg(&mut self, arg: Option<&str>) {
        let Some(raw) = arg else { return };
        match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => self.poll_interval_ms = v,
            _ => warn!(
                "Ignoring interval '{}', keeping {} ms",
                raw, self.poll_interval_ms
            ),
        }
    }
}
