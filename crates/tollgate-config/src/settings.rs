//! Application settings (as parsed from TOML)
//!
//! These settings describe the host shell, not the gate inputs themselves:
//! where durable state lives, what class of device the shell reports, and
//! the cosmetic delays the web surface uses.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Device class reported by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Phone,
    Tablet,
}

impl Default for DeviceClass {
    fn default() -> Self {
        Self::Phone
    }
}

/// Raw settings as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSettings {
    /// Settings schema version
    pub settings_version: u32,

    /// Data directory for the store
    pub data_dir: Option<PathBuf>,

    /// Device class reported by the shell
    #[serde(default)]
    pub device_class: Option<DeviceClass>,

    /// Milliseconds before the pull-to-refresh indicator is dismissed
    pub refresh_indicator_delay_ms: Option<u64>,

    /// Milliseconds after web-surface activation before the review prompt fires
    pub review_prompt_delay_ms: Option<u64>,
}

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}': {message}")]
    FieldError { field: String, message: String },
}

/// Validate raw settings
pub fn validate_settings(raw: &RawSettings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(ms) = raw.refresh_indicator_delay_ms {
        // The dismissal is a cosmetic bound; a minutes-long value means a
        // stuck spinner, which is what the bound exists to prevent.
        if ms == 0 || ms > 60_000 {
            errors.push(ValidationError::FieldError {
                field: "refresh_indicator_delay_ms".into(),
                message: format!("must be between 1 and 60000, got {ms}"),
            });
        }
    }

    if let Some(ms) = raw.review_prompt_delay_ms {
        if ms > 600_000 {
            errors.push(ValidationError::FieldError {
                field: "review_prompt_delay_ms".into(),
                message: format!("must be at most 600000, got {ms}"),
            });
        }
    }

    errors
}

/// Validated application settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Data directory for the store
    pub data_dir: PathBuf,

    /// Device class reported by the shell
    pub device_class: DeviceClass,

    /// How long the pull-to-refresh indicator stays up after a reload
    pub refresh_indicator_delay: Duration,

    /// Delay between web-surface activation and the review prompt
    pub review_prompt_delay: Duration,
}

impl Settings {
    pub fn from_raw(raw: RawSettings) -> Self {
        Self {
            data_dir: raw
                .data_dir
                .unwrap_or_else(tollgate_util::data_dir_without_env),
            device_class: raw.device_class.unwrap_or_default(),
            refresh_indicator_delay: Duration::from_millis(
                raw.refresh_indicator_delay_ms
                    .unwrap_or(DEFAULT_REFRESH_INDICATOR_DELAY_MS),
            ),
            review_prompt_delay: Duration::from_millis(
                raw.review_prompt_delay_ms
                    .unwrap_or(DEFAULT_REVIEW_PROMPT_DELAY_MS),
            ),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(RawSettings {
            settings_version: crate::CURRENT_SETTINGS_VERSION,
            data_dir: None,
            device_class: None,
            refresh_indicator_delay_ms: None,
            review_prompt_delay_ms: None,
        })
    }
}

/// Default pull-to-refresh indicator dismissal delay
pub const DEFAULT_REFRESH_INDICATOR_DELAY_MS: u64 = 1_000;

/// Default delay before the review prompt after web-surface activation
pub const DEFAULT_REVIEW_PROMPT_DELAY_MS: u64 = 2_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.device_class, DeviceClass::Phone);
        assert_eq!(settings.refresh_indicator_delay, Duration::from_secs(1));
        assert_eq!(settings.review_prompt_delay, Duration::from_secs(2));
    }

    #[test]
    fn zero_refresh_delay_is_rejected() {
        let raw = RawSettings {
            settings_version: 1,
            data_dir: None,
            device_class: None,
            refresh_indicator_delay_ms: Some(0),
            review_prompt_delay_ms: None,
        };

        let errors = validate_settings(&raw);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn device_class_round_trips_through_toml() {
        let parsed = crate::parse_settings(
            "settings_version = 1\ndevice_class = \"tablet\"\n",
        )
        .unwrap();
        assert_eq!(parsed.device_class, DeviceClass::Tablet);
    }
}
