//! Application configuration.

use crate::shortcuts::ShortcutMap;
use documenta_core::CAPTURE_DELAY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// User settings, stored as JSON. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where projects are saved. Defaults to the platform data directory.
    pub storage_dir: Option<PathBuf>,
    /// Pause before a screenshot is taken.
    pub capture_delay_ms: u64,
    pub shortcuts: ShortcutMap,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            capture_delay_ms: CAPTURE_DELAY.as_millis() as u64,
            shortcuts: ShortcutMap::default(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/documenta/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("documenta").join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(path, json).map_err(|e| write_err(e.to_string()))?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture_delay_ms)
    }
}
