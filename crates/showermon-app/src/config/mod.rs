//! Configuration loading and command-line overrides

pub mod settings;
pub mod types;

use std::path::PathBuf;

pub use settings::{load_settings, load_settings_file, CONFIG_FILENAME};
pub use types::{
    LogSettings, SerialSettings, Settings, StatusFormat, StatusSettings, DEFAULT_LOG_FILE,
};

/// Command-line options that override the settings file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit settings file
    pub config: Option<PathBuf>,
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub log_file: Option<PathBuf>,
    /// Force NDJSON status output
    pub json: bool,
    /// Read sensor lines from stdin instead of the serial port
    pub stdin: bool,
}

impl Settings {
    /// Apply command-line overrides on top of file settings
    pub fn apply_overrides(&mut self, options: &RunOptions) {
        if let Some(port) = &options.port {
            self.serial.port = port.clone();
        }
        if let Some(baud_rate) = options.baud_rate {
            self.serial.baud_rate = baud_rate;
        }
        if let Some(log_file) = &options.log_file {
            self.log.path = log_file.clone();
        }
        if options.json {
            self.status.format = StatusFormat::Json;
        }
    }
}
