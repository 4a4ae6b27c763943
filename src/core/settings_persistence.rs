//! Config persistence
//!
//! Saves and loads [`ControllerConfig`] to/from a JSON file in the user's
//! configuration directory.
//!
//! # Error Handling
//!
//! [`load_config_or_default`] never fails: a missing, unreadable or invalid
//! file is logged and replaced by defaults. The fallible variants are used
//! by the CLI when the user names a file explicitly.

use crate::core::config::ControllerConfig;
use crate::core::error::CoreResult;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config filename
const CONFIG_FILENAME: &str = "config.json";

/// Resolve the default config file path
///
/// E.g. `~/.config/board-controller/config.json` on Linux. Falls back to a
/// local `config.json` if the system config dir cannot be found.
pub fn default_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "board-controller", "BoardController") {
        proj_dirs.config_dir().join(CONFIG_FILENAME)
    } else {
        PathBuf::from(CONFIG_FILENAME)
    }
}

/// Read and validate a config file.
pub fn load_config(path: &Path) -> CoreResult<ControllerConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ControllerConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    info!("[SETTINGS] Loaded config from {:?}", path);
    Ok(config)
}

/// Load a config file, falling back to defaults on any problem
pub fn load_config_or_default(path: &Path) -> ControllerConfig {
    if !path.exists() {
        info!("[SETTINGS] No config file found at {:?}. Using defaults.", path);
        return ControllerConfig::default();
    }
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load config at {:?}: {}. Using defaults.",
                path, e
            );
            ControllerConfig::default()
        }
    }
}

/// Write the config as pretty JSON, creating parent directories as needed
pub fn save_config(path: &Path, config: &ControllerConfig) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved config to {:?}", path);
    Ok(())
}
