//! Configuration types for Shower Monitor
//!
//! Defines:
//! - `Settings` - Global application settings (showermon.toml)
//! - Related sub-types and enums

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use showermon_core::prelude::*;
use showermon_core::TrendSettings;
use showermon_serial::{default_port, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT_MS};

/// Default data log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "showerdatalog.csv";

/// Application settings (showermon.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub serial: SerialSettings,

    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub trend: TrendSettings,

    #[serde(default)]
    pub status: StatusSettings,
}

impl Settings {
    /// Check values that would make the monitor misbehave
    pub fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(Error::config_invalid("serial.baud_rate must be positive"));
        }
        self.trend.validate()
    }
}

/// Serial device settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SerialSettings {
    /// Device path of the XBee adapter
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout in milliseconds; only bounds shutdown latency
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_serial_port() -> String {
    default_port().to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Data log settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

/// Status output settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatusSettings {
    #[serde(default)]
    pub format: StatusFormat,
}

/// How status events are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// NDJSON, one event object per line
    Json,
}

impl std::fmt::Display for StatusFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFormat::Text => write!(f, "text"),
            StatusFormat::Json => write!(f, "json"),
        }
    }
}
