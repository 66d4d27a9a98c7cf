//! Web session run loop
//!
//! One `WebSession` per process that resolves to web-surface mode. The
//! session restores the persisted cookie snapshot before the first
//! navigation, saves a fresh snapshot after every successful load, answers
//! navigation-policy and dialog requests from the engine, and keeps the
//! pull-to-refresh indicator bounded.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tollgate_store::{CookieJarSnapshot, Store};
use tollgate_util::SurfaceSessionId;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    BrowserEngine, DialogHost, DialogRequest, EngineEvent, ExternalOpener,
    NavigationDecision, SurfaceOptions, SurfaceResult,
};

/// Default delay after which the refresh indicator is dismissed
pub const DEFAULT_REFRESH_DISMISS_DELAY: Duration = Duration::from_secs(1);

/// Scheme-based navigation policy: http(s) stays in the surface, anything
/// else leaves through the external opener.
pub fn navigation_policy(url: &Url) -> NavigationDecision {
    match url.scheme() {
        "http" | "https" => NavigationDecision::Allow,
        _ => NavigationDecision::Cancel,
    }
}

/// One embedded browsing session bound to the resolved endpoint.
pub struct WebSession {
    session_id: SurfaceSessionId,
    endpoint: Url,
    engine: Arc<dyn BrowserEngine>,
    store: Arc<dyn Store>,
    opener: Arc<dyn ExternalOpener>,
    dialog_host: Option<Arc<dyn DialogHost>>,
    options: SurfaceOptions,
    refresh_dismiss_delay: Duration,
    refresh_tx: Arc<watch::Sender<bool>>,
    refresh_rx: watch::Receiver<bool>,
}

impl WebSession {
    pub fn new(
        endpoint: &str,
        engine: Arc<dyn BrowserEngine>,
        store: Arc<dyn Store>,
        opener: Arc<dyn ExternalOpener>,
    ) -> SurfaceResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        let (refresh_tx, refresh_rx) = watch::channel(false);

        Ok(Self {
            session_id: SurfaceSessionId::new(),
            endpoint,
            engine,
            store,
            opener,
            dialog_host: None,
            options: SurfaceOptions::default(),
            refresh_dismiss_delay: DEFAULT_REFRESH_DISMISS_DELAY,
            refresh_tx: Arc::new(refresh_tx),
            refresh_rx,
        })
    }

    /// Attach a dialog host. Without one, JS dialogs complete immediately
    /// with their defaults.
    pub fn with_dialog_host(mut self, host: Arc<dyn DialogHost>) -> Self {
        self.dialog_host = Some(host);
        self
    }

    pub fn with_options(mut self, options: SurfaceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_refresh_dismiss_delay(mut self, delay: Duration) -> Self {
        self.refresh_dismiss_delay = delay;
        self
    }

    pub fn session_id(&self) -> &SurfaceSessionId {
        &self.session_id
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether the pull-to-refresh indicator is currently up.
    pub fn refresh_indicator(&self) -> watch::Receiver<bool> {
        self.refresh_rx.clone()
    }

    /// Bootstrap the session: configure the engine, restore the persisted
    /// cookie snapshot, then issue the first navigation.
    ///
    /// Restoration is awaited before the load starts; an unreadable
    /// snapshot or a failed restore degrades to a cookie-less first load.
    pub async fn start(&self) -> SurfaceResult<()> {
        info!(
            session_id = %self.session_id,
            endpoint = %self.endpoint,
            "Web session starting"
        );

        self.engine.configure(&self.options).await?;

        let snapshot = match self.store.load_cookie_snapshot() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Cookie snapshot unreadable, starting without");
                None
            }
        };

        if let Some(snapshot) = snapshot {
            if !snapshot.is_empty() {
                debug!(
                    cookie_count = snapshot.cookies.len(),
                    "Restoring cookie snapshot"
                );
                if let Err(e) = self.engine.set_cookies(snapshot.cookies).await {
                    warn!(error = %e, "Cookie restore failed, continuing");
                }
            }
        }

        self.engine.load(&self.endpoint).await
    }

    /// Drain engine events until the engine closes its channel.
    pub async fn run(&self) {
        let mut events = self.engine.subscribe();
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        debug!(session_id = %self.session_id, "Engine event stream closed");
    }

    /// Apply one engine event. `run` drains the subscription; platform
    /// glue that dispatches events itself can call this directly.
    pub async fn handle_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::LoadFinished { url } => {
                debug!(%url, "Load finished");
                self.set_refreshing(false);
                self.save_cookies().await;
            }

            EngineEvent::LoadFailed { url, error } => {
                debug!(?url, error = %error, "Load failed");
                self.set_refreshing(false);
            }

            EngineEvent::NavigationRequested { url, decision } => {
                let verdict = navigation_policy(&url);
                if verdict == NavigationDecision::Cancel {
                    info!(%url, "Non-http scheme, dispatching to platform opener");
                    self.opener.open(&url);
                }
                let _ = decision.send(verdict);
            }

            EngineEvent::NewWindowRequested { url } => {
                // No second surface; the request folds into this one.
                debug!(%url, "New window request folded into primary surface");
                if let Err(e) = self.engine.load(&url).await {
                    warn!(error = %e, "Failed to load new-window URL");
                }
            }

            EngineEvent::Dialog(request) => self.handle_dialog(request).await,
        }
    }

    async fn handle_dialog(&self, request: DialogRequest) {
        match request {
            DialogRequest::Alert { message, done } => {
                if let Some(host) = &self.dialog_host {
                    host.alert(&message).await;
                }
                // Default without a host: proceed immediately.
                let _ = done.send(());
            }

            DialogRequest::Confirm { message, answer } => {
                let choice = match &self.dialog_host {
                    Some(host) => host.confirm(&message).await,
                    None => false,
                };
                let _ = answer.send(choice);
            }
        }
    }

    /// User-triggered reload of the current page.
    ///
    /// The indicator is dismissed after a fixed delay whether or not the
    /// load has finished; the delay is a cosmetic bound, not a correctness
    /// mechanism.
    pub async fn refresh(&self) {
        self.set_refreshing(true);

        if let Err(e) = self.engine.reload().await {
            warn!(error = %e, "Reload failed");
        }

        let tx = self.refresh_tx.clone();
        let delay = self.refresh_dismiss_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(false);
        });
    }

    fn set_refreshing(&self, value: bool) {
        let _ = self.refresh_tx.send(value);
    }

    /// Snapshot the engine's cookie store. Best-effort: any failure is
    /// logged and swallowed, cookies just aren't saved for this cycle.
    async fn save_cookies(&self) {
        let cookies = match self.engine.cookies().await {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "Cookie enumeration failed, skipping save");
                return;
            }
        };

        let snapshot = CookieJarSnapshot::new(cookies);
        if let Err(e) = self.store.save_cookie_snapshot(&snapshot) {
            debug!(error = %e, "Cookie snapshot save failed");
        }
    }
}
