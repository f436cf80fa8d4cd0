//! Settings parser for showermon.toml

use super::types::Settings;
use showermon_core::prelude::*;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is not given
pub const CONFIG_FILENAME: &str = "showermon.toml";

/// Load settings from `showermon.toml` in `dir`
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(dir: &Path) -> Settings {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings from an explicitly requested file
///
/// Unlike [`load_settings`], a missing or invalid file is an error: the
/// operator asked for this file by name.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;

    let settings = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))?;

    debug!("Loaded settings from {:?}", path);
    Ok(settings)
}
