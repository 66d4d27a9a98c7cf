//! Store trait definitions

use crate::{CookieJarSnapshot, DecisionRecord, StoreResult};

/// Durable boolean keys.
///
/// `FallbackLatch` is a one-way latch: the application sets it and never
/// clears it. The shown markers gate one-time side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKey {
    FallbackLatch,
    WebSurfaceShown,
    RatingShown,
}

impl FlagKey {
    /// Stable storage key. Versioned so a future format change can migrate
    /// by key rename instead of in-place rewrites.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKey::FallbackLatch => "fallback_state_v1",
            FlagKey::WebSurfaceShown => "web_surface_shown_v1",
            FlagKey::RatingShown => "rating_shown_v1",
        }
    }
}

/// Main store trait
pub trait Store: Send + Sync {
    // Durable flags

    /// Read a flag. A missing key reads as `false`.
    fn get_flag(&self, key: FlagKey) -> StoreResult<bool>;

    /// Write a flag. Idempotent.
    fn set_flag(&self, key: FlagKey, value: bool) -> StoreResult<()>;

    // Cookie snapshot

    /// Load the last saved cookie snapshot, if any
    fn load_cookie_snapshot(&self) -> StoreResult<Option<CookieJarSnapshot>>;

    /// Overwrite the cookie snapshot
    fn save_cookie_snapshot(&self, snapshot: &CookieJarSnapshot) -> StoreResult<()>;

    // Decision log

    /// Append a decision record
    fn append_decision(&self, record: DecisionRecord) -> StoreResult<()>;

    /// Get recent decision records, newest first
    fn recent_decisions(&self, limit: usize) -> StoreResult<Vec<DecisionRecord>>;

    // Health

    /// Check if the store is healthy
    fn is_healthy(&self) -> bool;
}
