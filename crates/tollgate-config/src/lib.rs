//! Configuration for tollgate
//!
//! Two unrelated kinds of configuration live here:
//! - `resource`: the compiled-in, base64-obfuscated destination endpoint and
//!   activation date consulted by the activation gate
//! - `settings`: TOML application settings with a versioned schema and
//!   validation with clear error messages

mod resource;
mod settings;

pub use resource::*;
pub use settings::*;

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate settings from a TOML file
pub fn load_settings(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse and validate settings from a TOML string
pub fn parse_settings(content: &str) -> ConfigResult<Settings> {
    let raw: RawSettings = toml::from_str(content)?;

    // Check version
    if raw.settings_version != CURRENT_SETTINGS_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.settings_version));
    }

    // Validate
    let errors = validate_settings(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(Settings::from_raw(raw))
}

/// Current supported settings version
pub const CURRENT_SETTINGS_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_settings() {
        let content = r#"
            settings_version = 1
        "#;

        let settings = parse_settings(content).unwrap();
        assert_eq!(settings.device_class, DeviceClass::Phone);
    }

    #[test]
    fn reject_wrong_version() {
        let content = r#"
            settings_version = 99
        "#;

        let result = parse_settings(content);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "settings_version = 1\ndevice_class = \"tablet\"\n",
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.device_class, DeviceClass::Tablet);
    }
}
