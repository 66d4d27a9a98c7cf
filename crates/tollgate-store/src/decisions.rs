//! Decision log types
//!
//! Every gate run appends the terminal decision it reached. The log is
//! append-only and exists for field debugging ("why is this install stuck
//! in native mode"); nothing in the gate reads it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The decision a gate run reached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionEvent {
    /// Native mode, with the structured reason code that short-circuited
    Native { reason: String },

    /// Web-surface mode bound to the resolved endpoint
    WebSurface { endpoint: String },
}

/// Full decision record with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Unique record ID
    pub id: i64,

    /// Record timestamp
    pub timestamp: DateTime<Utc>,

    /// The decision and its details
    pub event: DecisionEvent,
}

impl DecisionRecord {
    pub fn new(event: DecisionEvent) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp: tollgate_util::now(),
            event,
        }
    }
}
