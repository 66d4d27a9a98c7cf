//! Review prompt trigger
//!
//! Shortly after web-surface mode activates, the app asks the platform to
//! show its store review prompt, at most once per install. The trigger is
//! decoupled from the gate: it only reads and writes its own marker.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tollgate_store::{FlagKey, Store};
use tracing::{debug, info, warn};

/// Presentation-side hook for the platform review prompt.
#[async_trait]
pub trait ReviewPrompter: Send + Sync {
    /// Ask the platform to present its review prompt. Returns whether a
    /// prompt surface was available and the prompt was actually shown.
    async fn request_review(&self) -> bool;
}

/// Schedule the one-time review prompt.
///
/// Sleeps `delay`, re-checks the shown marker, and only marks it after the
/// prompter reports the prompt was shown — an unavailable surface retries
/// on a later launch.
pub fn schedule_review_prompt(
    store: Arc<dyn Store>,
    prompter: Arc<dyn ReviewPrompter>,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let already_shown = match store.get_flag(FlagKey::RatingShown) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Rating marker unreadable, treating as unset");
                false
            }
        };
        if already_shown {
            debug!("Review prompt already shown for this install");
            return;
        }

        if prompter.request_review().await {
            if let Err(e) = store.set_flag(FlagKey::RatingShown, true) {
                warn!(error = %e, "Failed to persist rating marker");
            }
            info!("Review prompt shown");
        } else {
            debug!("No prompt surface available, will retry on a later launch");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tollgate_store::SqliteStore;

    struct MockPrompter {
        calls: AtomicUsize,
        shown: bool,
    }

    impl MockPrompter {
        fn new(shown: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                shown,
            }
        }
    }

    #[async_trait]
    impl ReviewPrompter for MockPrompter {
        async fn request_review(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.shown
        }
    }

    #[tokio::test]
    async fn prompt_shown_sets_marker() {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().unwrap());
        let prompter = Arc::new(MockPrompter::new(true));

        schedule_review_prompt(store.clone(), prompter.clone(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(prompter.calls.load(Ordering::SeqCst), 1);
        assert!(store.get_flag(FlagKey::RatingShown).unwrap());
    }

    #[tokio::test]
    async fn unavailable_surface_leaves_marker_unset() {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().unwrap());
        let prompter = Arc::new(MockPrompter::new(false));

        schedule_review_prompt(store.clone(), prompter.clone(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(prompter.calls.load(Ordering::SeqCst), 1);
        // Not marked; a later launch gets another chance.
        assert!(!store.get_flag(FlagKey::RatingShown).unwrap());
    }

    #[tokio::test]
    async fn marker_suppresses_second_prompt() {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().unwrap());
        store.set_flag(FlagKey::RatingShown, true).unwrap();
        let prompter = Arc::new(MockPrompter::new(true));

        schedule_review_prompt(store.clone(), prompter.clone(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(prompter.calls.load(Ordering::SeqCst), 0);
    }
}
