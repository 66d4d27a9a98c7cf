//! Web-surface session manager for tollgate
//!
//! When the gate resolves to web-surface mode, one embedded browsing
//! session owns the whole app surface. This crate contains:
//! - The `BrowserEngine`, `DialogHost`, and `ExternalOpener` traits the
//!   platform glue implements
//! - The `WebSession` run loop: cookie restore before first navigation,
//!   cookie save after every successful load, pull-to-refresh with a
//!   bounded indicator, scheme-based navigation policy, and JS dialog
//!   bridging with default responses
//! - Mock implementations for testing

mod mock;
mod options;
mod session;
mod traits;

pub use mock::*;
pub use options::*;
pub use session::*;
pub use traits::*;

use thiserror::Error;

/// Surface errors
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Engine error: {0}")]
    Engine(String),
}

impl SurfaceError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
