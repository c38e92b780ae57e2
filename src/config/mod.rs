//! # Configuration Management Module
//!
//! Typed TOML configuration for the soul ledger service, with defaults for every section.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - display name used in startup logs
//! - [`StorageConfig`] - where the souls document lives
//! - [`AutosaveConfig`] - periodic flush cadence
//! - [`LoggingConfig`] - log level and optional log file
//! - [`PermissionsConfig`] - names granted admin rights by the console host
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soulkeeper::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Souls file: {}", config.storage.souls_path().display());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! name = "Soulkeeper"
//!
//! [storage]
//! data_dir = "./data"
//! souls_file = "souls.json"
//!
//! [autosave]
//! enabled = true
//! frequency = "1hour"
//!
//! [logging]
//! level = "info"
//! file = "soulkeeper.log"
//!
//! [permissions]
//! admins = ["Steve"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::storage::{souls_path, SOULS_FILE_NAME};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub permissions: PermissionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    #[serde(default = "default_souls_file")]
    pub souls_file: String,
}

fn default_souls_file() -> String {
    SOULS_FILE_NAME.to_string()
}

impl StorageConfig {
    pub fn souls_path(&self) -> PathBuf {
        souls_path(&self.data_dir, &self.souls_file)
    }
}

/// Periodic flush of the ledger to disk.
///
/// Supported frequencies: "5min", "15min", "30min", "1hour" (default), "2hours", "4hours".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    pub enabled: bool,
    pub frequency: String,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: "1hour".to_string(),
        }
    }
}

impl AutosaveConfig {
    /// Convert the frequency string to minutes. Invalid values default to 60.
    pub fn frequency_minutes(&self) -> u64 {
        match self.frequency.as_str() {
            "5min" => 5,
            "15min" => 15,
            "30min" => 30,
            "1hour" => 60,
            "2hours" => 120,
            "4hours" => 240,
            other => {
                warn!("Invalid autosave frequency '{}', defaulting to 1hour", other);
                60
            }
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.frequency_minutes() * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// Player names (case-insensitive) that hold the admin permission.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl PermissionsConfig {
    pub fn is_admin(&self, name: &str) -> bool {
        self.admins.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                name: "Soulkeeper".to_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                souls_file: default_souls_file(),
            },
            autosave: AutosaveConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("soulkeeper.log".to_string()),
            },
            permissions: PermissionsConfig::default(),
        }
    }
}
