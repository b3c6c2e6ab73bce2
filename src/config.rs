//! Runtime configuration: backend location and playback cadence.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CubeViewError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub animation: AnimationConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.server.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CubeViewError::Config(format!(
                "server URL `{url}` must start with http:// or https://"
            )));
        }
        if self.server.timeout_ms == 0 {
            return Err(CubeViewError::Config(
                "request timeout must be at least 1 ms".into(),
            ));
        }
        if self.animation.frame_interval_ms == 0 {
            return Err(CubeViewError::Config(
                "frame interval must be at least 1 ms".into(),
            ));
        }
        Ok(())
    }
}

/// Where the puzzle backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_ms: 5_000,
        }
    }
}

/// Move playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Time each intermediate snapshot stays on screen.
    pub frame_interval_ms: u64,
}

impl AnimationConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 50,
        }
    }
}
