//! Mock browsing engine and collaborators for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tollgate_store::CookieRecord;
use url::Url;

use crate::{
    BrowserEngine, DialogHost, EngineEvent, ExternalOpener, SurfaceError,
    SurfaceOptions, SurfaceResult,
};

/// Mock browsing engine for unit/integration testing.
///
/// Records every call in order so tests can assert sequencing (cookie
/// restore before first load, etc.) and lets tests inject engine events.
pub struct MockBrowser {
    options: Mutex<Option<SurfaceOptions>>,
    cookie_jar: Mutex<Vec<CookieRecord>>,
    loads: Mutex<Vec<Url>>,
    reload_count: AtomicUsize,
    op_log: Mutex<Vec<String>>,
    event_tx: Mutex<Option<mpsc::UnboundedSender<EngineEvent>>>,
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<EngineEvent>>>,

    /// Configure cookie enumeration to fail
    pub fail_cookie_read: Mutex<bool>,

    /// Configure loads to fail
    pub fail_load: Mutex<bool>,
}

impl MockBrowser {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            options: Mutex::new(None),
            cookie_jar: Mutex::new(Vec::new()),
            loads: Mutex::new(Vec::new()),
            reload_count: AtomicUsize::new(0),
            op_log: Mutex::new(Vec::new()),
            event_tx: Mutex::new(Some(tx)),
            event_rx: Mutex::new(Some(rx)),
            fail_cookie_read: Mutex::new(false),
            fail_load: Mutex::new(false),
        }
    }

    /// Inject an engine event, as the real engine's callbacks would.
    pub fn emit(&self, event: EngineEvent) {
        if let Some(tx) = self.event_tx.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    /// Close the event stream, ending a `WebSession::run` loop.
    pub fn close_events(&self) {
        self.event_tx.lock().unwrap().take();
    }

    /// Put a cookie directly into the engine store, as page content would.
    pub fn put_cookie(&self, cookie: CookieRecord) {
        self.cookie_jar.lock().unwrap().push(cookie);
    }

    /// Calls made so far, in order.
    pub fn ops(&self) -> Vec<String> {
        self.op_log.lock().unwrap().clone()
    }

    /// URLs loaded so far, in order.
    pub fn loads(&self) -> Vec<Url> {
        self.loads.lock().unwrap().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.reload_count.load(Ordering::SeqCst)
    }

    /// Current contents of the engine cookie store.
    pub fn cookie_jar(&self) -> Vec<CookieRecord> {
        self.cookie_jar.lock().unwrap().clone()
    }

    /// Options applied via `configure`, if any.
    pub fn applied_options(&self) -> Option<SurfaceOptions> {
        self.options.lock().unwrap().clone()
    }

    fn log(&self, op: impl Into<String>) {
        self.op_log.lock().unwrap().push(op.into());
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserEngine for MockBrowser {
    async fn configure(&self, options: &SurfaceOptions) -> SurfaceResult<()> {
        self.log("configure");
        *self.options.lock().unwrap() = Some(options.clone());
        Ok(())
    }

    async fn set_cookies(&self, cookies: Vec<CookieRecord>) -> SurfaceResult<()> {
        self.log("set_cookies");
        let mut jar = self.cookie_jar.lock().unwrap();
        for cookie in cookies {
            // Upsert by name, matching real engine cookie-store semantics.
            if let Some(existing) = jar.iter_mut().find(|c| c.name == cookie.name) {
                *existing = cookie;
            } else {
                jar.push(cookie);
            }
        }
        Ok(())
    }

    async fn cookies(&self) -> SurfaceResult<Vec<CookieRecord>> {
        self.log("cookies");
        if *self.fail_cookie_read.lock().unwrap() {
            return Err(SurfaceError::engine("Mock cookie read failure"));
        }
        Ok(self.cookie_jar.lock().unwrap().clone())
    }

    async fn load(&self, url: &Url) -> SurfaceResult<()> {
        if *self.fail_load.lock().unwrap() {
            return Err(SurfaceError::engine("Mock load failure"));
        }
        self.log(format!("load {url}"));
        self.loads.lock().unwrap().push(url.clone());
        Ok(())
    }

    async fn reload(&self) -> SurfaceResult<()> {
        self.log("reload");
        self.reload_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap()
            .take()
            .expect("subscribe() can only be called once")
    }
}

/// External opener that records dispatched URLs.
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

impl ExternalOpener for RecordingOpener {
    fn open(&self, url: &Url) {
        self.opened.lock().unwrap().push(url.clone());
    }
}

/// Dialog host scripted with a fixed confirm answer.
pub struct ScriptedDialogHost {
    answer: bool,
    alerts: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
}

impl ScriptedDialogHost {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogHost for ScriptedDialogHost {
    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    async fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_upserts_cookies_by_name() {
        let browser = MockBrowser::new();

        browser
            .set_cookies(vec![CookieRecord::new("a", "1"), CookieRecord::new("b", "2")])
            .await
            .unwrap();
        browser
            .set_cookies(vec![CookieRecord::new("a", "9")])
            .await
            .unwrap();

        let jar = browser.cookie_jar();
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.iter().find(|c| c.name == "a").unwrap().value, "9");
    }

    #[tokio::test]
    async fn mock_load_failure() {
        let browser = MockBrowser::new();
        *browser.fail_load.lock().unwrap() = true;

        let url = Url::parse("https://example.com/").unwrap();
        assert!(browser.load(&url).await.is_err());
        assert!(browser.loads().is_empty());
    }
}
