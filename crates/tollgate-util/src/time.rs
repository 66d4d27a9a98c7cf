//! Time source for tollgate
//!
//! The activation gate compares the current UTC time against a configured
//! activation threshold, so everything time-sensitive goes through [`now`].
//!
//! # Mock Time for Development
//!
//! In debug builds, the `TOLLGATE_MOCK_TIME` environment variable can be set
//! to override the system time. This is useful for exercising the activation
//! threshold on either side without waiting for the calendar.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (UTC), e.g. `2026-02-05 00:00:00`
//!
//! Example:
//! ```bash
//! TOLLGATE_MOCK_TIME="2026-02-05 00:00:00" tollgate-app
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "TOLLGATE_MOCK_TIME";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Initialize the mock time offset based on the environment variable.
/// Returns the offset between mock time and real time at process start.
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                if let Ok(naive_dt) =
                    NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S")
                {
                    let mock_dt = naive_dt.and_utc();
                    let real_now = Utc::now();
                    let offset = mock_dt.signed_duration_since(real_now);
                    tracing::info!(
                        mock_time = %mock_time_str,
                        offset_secs = offset.num_seconds(),
                        "Mock time enabled"
                    );
                    return Some(offset);
                } else {
                    tracing::warn!(
                        mock_time = %mock_time_str,
                        expected_format = "%Y-%m-%d %H:%M:%S",
                        "Invalid mock time format"
                    );
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current UTC time, respecting mock time settings in debug builds.
///
/// In release builds, this always returns the real system time.
/// In debug builds, if `TOLLGATE_MOCK_TIME` is set, this returns a time
/// that advances from the mock time at the same rate as real time.
pub fn now() -> DateTime<Utc> {
    let real_now = Utc::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_close_to_system_time() {
        // Without the env var set, now() tracks the system clock.
        let a = now();
        let b = Utc::now();
        assert!((b - a).num_seconds().abs() < 2);
    }
}
