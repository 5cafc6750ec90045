//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Serial link configuration
    #[serde(default)]
    pub serial: SerialConfig,

    /// Panel configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Game of Life demo configuration
    #[serde(default)]
    pub life: LifeConfig,
}

/// Serial link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path
    #[serde(default = "default_port")]
    pub port: String,

    /// Baud rate
    #[serde(default = "default_baud")]
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud: default_baud(),
        }
    }
}

/// Panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Bus address (set with the panel's rotary switch)
    #[serde(default)]
    pub address: u8,

    /// Rows per column, hidden rows included
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Columns
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: 0,
            rows: default_rows(),
            columns: default_columns(),
        }
    }
}

/// Game of Life demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Delay between generations in milliseconds
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
        }
    }
}

// Default value functions
fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud() -> u32 {
    hanover_flipdot_hw::BAUD_RATE
}

fn default_rows() -> usize {
    hanover_flipdot_hw::DEFAULT_ROWS
}

fn default_columns() -> usize {
    hanover_flipdot_hw::DEFAULT_COLUMNS
}

fn default_interval() -> u64 {
    500
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        Self::parse(&content)
    }

    /// Loads configuration, falling back to defaults if the file is missing.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud, 4800);
        assert_eq!(config.display.address, 0);
        assert_eq!(config.display.rows, 16);
        assert_eq!(config.display.columns, 20);
        assert_eq!(config.life.interval_ms, 500);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [serial]
            port = "/dev/ttyS1"

            [display]
            address = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.serial.port, "/dev/ttyS1");
        assert_eq!(config.serial.baud, 4800);
        assert_eq!(config.display.address, 3);
        assert_eq!(config.display.columns, 20);
    }

    #[test]
    fn test_empty_file() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.display.rows, 16);
    }

    #[test]
    fn test_invalid_file() {
        assert!(Config::parse("[display]\naddress = 300").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("flipdotctl-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.display.address = 7;
        config.save(&path).unwrap();

        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded.display.address, 7);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_or_default("/nonexistent/flipdot.toml").unwrap();
        assert_eq!(config.serial.baud, 4800);
    }
}
