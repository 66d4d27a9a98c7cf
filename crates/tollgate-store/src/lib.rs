//! Persistence layer for tollgate
//!
//! Provides:
//! - Durable boolean flags (fallback latch, shown markers)
//! - The serialized cookie snapshot for the web surface
//! - Decision log (append-only)
//!
//! Every entry is an independently idempotent single-key write; there are
//! no multi-key transactional guarantees, and none are needed.

mod cookies;
mod decisions;
mod sqlite;
mod traits;

pub use cookies::*;
pub use decisions::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
