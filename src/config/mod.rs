//! # Configuration Management Module
//!
//! Centralized configuration for the daemon: type-safe structures with serde,
//! sensible defaults, and TOML persistence.
//!
//! ## Configuration Structure
//!
//! - [`StationConfig`] - Identity of this installation (name, location)
//! - [`ControllerConfig`] - Serial link to the sensor controller
//! - [`StorageConfig`] - Data persistence settings
//! - [`LoggingConfig`] - Logging settings
//!
//! ## Configuration File Format
//!
//! ```toml
//! [station]
//! name = "Greenhouse West"
//! location = "Back lot"
//!
//! [controller]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! file = "growlink.log"
//! ```
//!
//! CLI arguments override config file values, which override defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    pub controller: ControllerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Require the controller to be reachable at startup. If true and the
    /// serial port cannot be opened, the daemon exits with an error. If false
    /// (default), the daemon starts idle and records nothing until restarted
    /// with a working link.
    #[serde(default)]
    pub require_device_at_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
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
            station: StationConfig {
                name: "growlink Station".to_string(),
                location: "Your Location".to_string(),
            },
            controller: ControllerConfig {
                port: "/dev/ttyUSB0".to_string(),
                baud_rate: 115200,
                require_device_at_startup: false,
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("growlink.log".to_string()),
            },
        }
    }
}
