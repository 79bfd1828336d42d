//! Configuration for the system monitor
//!
//! Configuration is read-only: `Config::load()` falls back to defaults when
//! no file exists, and nothing is ever written back.

use crate::error::{Error, Result};
use crate::platform::linux::ProcPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// System monitor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General options
    #[serde(default)]
    pub general: GeneralConfig,
    /// Locations of the files the reader parses
    #[serde(default)]
    pub paths: ProcPaths,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// CPU sampling window in milliseconds
    #[serde(default = "default_update_interval")]
    pub update_interval_ms: u64,
    /// Maximum number of processes listed (0 = all)
    #[serde(default)]
    pub process_limit: usize,
}

fn default_update_interval() -> u64 {
    1000 // 1 second
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval(),
            process_limit: 0,
        }
    }
}

impl GeneralConfig {
    /// The sampling window as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Set the sampling window from seconds, rounded to the millisecond
    pub fn set_interval_secs(&mut self, secs: f64) -> Result<()> {
        let ms = (secs * 1000.0).round();
        if !(ms.is_finite() && ms >= 0.0 && ms < u64::MAX as f64) {
            return Err(Error::Config(format!("Invalid interval: {}", secs)));
        }
        self.update_interval_ms = ms as u64;
        Ok(())
    }
}

impl Config {
    /// Get the default configuration directory
    ///
    /// Returns `~/.config/sysmon`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".config"));

        Ok(config_dir.join("sysmon"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_file = Self::default_path()?.join("config.toml");

        if !config_file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}
