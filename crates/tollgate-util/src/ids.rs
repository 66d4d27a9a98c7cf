//! Strongly-typed identifiers for tollgate

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one embedded web-surface session.
///
/// A new ID is minted per process launch that resolves to web-surface
/// mode; it only exists for log correlation and never persists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSessionId(Uuid);

impl SurfaceSessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SurfaceSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_uniqueness() {
        let s1 = SurfaceSessionId::new();
        let s2 = SurfaceSessionId::new();
        assert_ne!(s1, s2);
    }

    #[test]
    fn session_id_serialize_deserialize() {
        let id = SurfaceSessionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: SurfaceSessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
