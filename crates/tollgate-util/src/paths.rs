//! Default paths for tollgate components
//!
//! Paths are user-writable by default (no root required):
//! - Settings: `$XDG_CONFIG_HOME/tollgate/settings.toml` or `~/.config/tollgate/settings.toml`
//! - Data: `$XDG_DATA_HOME/tollgate` or `~/.local/share/tollgate`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const TOLLGATE_DATA_DIR_ENV: &str = "TOLLGATE_DATA_DIR";

/// Settings filename within the config directory
const SETTINGS_FILENAME: &str = "settings.toml";

/// Application subdirectory name
const APP_DIR: &str = "tollgate";

/// Get the default settings file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/tollgate/settings.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/tollgate/settings.toml` (fallback)
pub fn default_settings_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(SETTINGS_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(SETTINGS_FILENAME);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join(SETTINGS_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$TOLLGATE_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/tollgate` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/tollgate` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(TOLLGATE_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking TOLLGATE_DATA_DIR env var.
/// Used for default values in settings where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
