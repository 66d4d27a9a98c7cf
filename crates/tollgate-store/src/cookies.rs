//! Cookie snapshot types
//!
//! The web surface persists the engine's cookie store across launches as a
//! single opaque snapshot, overwritten after every successful page load and
//! restored once at session start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cookie's property mapping, as held by the browsing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,

    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    /// Expiry; session cookies carry none
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,

    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub http_only: bool,
}

impl CookieRecord {
    /// Minimal cookie with just a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            secure: false,
            http_only: false,
        }
    }
}

/// Serialized list of cookie property mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieJarSnapshot {
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,

    /// All cookies in the engine's store at save time
    pub cookies: Vec<CookieRecord>,
}

impl CookieJarSnapshot {
    pub fn new(cookies: Vec<CookieRecord>) -> Self {
        Self {
            saved_at: tollgate_util::now(),
            cookies,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_and_parses() {
        let snapshot = CookieJarSnapshot::new(vec![
            CookieRecord::new("a", "1"),
            CookieRecord {
                domain: Some(".crontime.online".into()),
                path: Some("/".into()),
                secure: true,
                ..CookieRecord::new("session", "abc123")
            },
        ]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: CookieJarSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cookies, snapshot.cookies);
    }
}
