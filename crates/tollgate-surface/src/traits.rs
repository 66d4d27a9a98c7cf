//! Browsing engine traits
//!
//! The platform embeds a real browser engine; the session manager only
//! sees these traits. Engine-side callbacks that need an answer (navigation
//! policy, JS dialogs) travel as events carrying a oneshot responder, so
//! the page stays suspended until the session answers.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tollgate_store::CookieRecord;
use url::Url;

use crate::{SurfaceOptions, SurfaceResult};

/// Verdict for a requested navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Load in the embedded surface
    Allow,

    /// Do not load; the session has dispatched the URL elsewhere
    Cancel,
}

/// A JS dialog raised by page content, with its response channel.
#[derive(Debug)]
pub enum DialogRequest {
    /// `alert()`: page resumes unconditionally once answered
    Alert {
        message: String,
        done: oneshot::Sender<()>,
    },

    /// `confirm()`: page resumes with the user's choice
    Confirm {
        message: String,
        answer: oneshot::Sender<bool>,
    },
}

/// Events from the browsing engine.
#[derive(Debug)]
pub enum EngineEvent {
    /// A main-frame load completed successfully
    LoadFinished { url: Url },

    /// A main-frame load failed
    LoadFailed { url: Option<Url>, error: String },

    /// The engine asks whether to perform a navigation
    NavigationRequested {
        url: Url,
        decision: oneshot::Sender<NavigationDecision>,
    },

    /// Page content asked for a new window (`target=_blank`, JS popup)
    NewWindowRequested { url: Url },

    /// Page content raised a JS dialog
    Dialog(DialogRequest),
}

/// Embedded browsing engine, implemented by the platform glue.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Apply surface options before first use.
    async fn configure(&self, _options: &SurfaceOptions) -> SurfaceResult<()> {
        Ok(())
    }

    /// Set all given cookies in the engine's store as one batch, returning
    /// once every cookie is in place.
    async fn set_cookies(&self, cookies: Vec<CookieRecord>) -> SurfaceResult<()>;

    /// Enumerate all cookies currently in the engine's store.
    async fn cookies(&self) -> SurfaceResult<Vec<CookieRecord>>;

    /// Begin a navigation. Completion arrives as an `EngineEvent`.
    async fn load(&self, url: &Url) -> SurfaceResult<()>;

    /// Reload the current page.
    async fn reload(&self) -> SurfaceResult<()>;

    /// Subscribe to engine events. Can only be called once.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent>;
}

/// Native modal dialogs, implemented by the presentation layer.
///
/// When no host is attached (no presentable window surface), the session
/// answers dialogs itself with the defaults.
#[async_trait]
pub trait DialogHost: Send + Sync {
    /// Present an alert; returns when the user dismisses it.
    async fn alert(&self, message: &str);

    /// Present a confirm; returns the user's choice.
    async fn confirm(&self, message: &str) -> bool;
}

/// OS-level URL opener for deep-link egress.
pub trait ExternalOpener: Send + Sync {
    /// Hand a URL to the platform. Fire-and-forget.
    fn open(&self, url: &Url);
}
