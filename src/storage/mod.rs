//! Storage Layer
//!
//! Locates the platform directory holding the overlay configuration.

use anyhow::Result;
use std::path::PathBuf;

/// File name of the configuration inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the configuration directory, creating it if needed
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("dev", "devoverlay", "DevOverlay")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default path of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}
