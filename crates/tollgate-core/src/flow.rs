//! Observable flow state
//!
//! Holds the operating mode, the launch loading flag, and the resolved
//! endpoint behind a watch channel. The mode is write-once per process:
//! exactly one transition out of `Preparing`, atomic with the loading flag
//! flipping to false, so observers never see a torn intermediate state.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::GateDecision;

/// The app's operating mode for this process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Gate has not decided yet; the shell shows its loading surface
    Preparing,

    /// The app's own expense-tracking UI
    Native,

    /// The entire surface is the embedded browser
    WebSurface,
}

/// The value observers receive. Replaced wholesale on the single
/// mode transition.
#[derive(Debug, Clone)]
pub struct FlowSnapshot {
    pub mode: OperatingMode,
    pub loading: bool,
    pub endpoint: Option<String>,
}

impl FlowSnapshot {
    fn preparing() -> Self {
        Self {
            mode: OperatingMode::Preparing,
            loading: true,
            endpoint: None,
        }
    }
}

/// Flow state errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Flow state already decided")]
    AlreadyDecided,
}

/// Shared observable flow state
#[derive(Clone)]
pub struct FlowState {
    tx: Arc<watch::Sender<FlowSnapshot>>,
    rx: watch::Receiver<FlowSnapshot>,
}

impl FlowState {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(FlowSnapshot::preparing());
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Current operating mode
    pub fn mode(&self) -> OperatingMode {
        self.rx.borrow().mode
    }

    /// Whether the gate is still deciding
    pub fn loading(&self) -> bool {
        self.rx.borrow().loading
    }

    /// Resolved endpoint; present iff mode is `WebSurface`
    pub fn endpoint(&self) -> Option<String> {
        self.rx.borrow().endpoint.clone()
    }

    /// Current full snapshot
    pub fn snapshot(&self) -> FlowSnapshot {
        self.rx.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.rx.clone()
    }

    /// Publish the terminal decision.
    ///
    /// The first call flips `Preparing` to the terminal mode and clears the
    /// loading flag in one send. A second call fails and changes nothing,
    /// without waking observers.
    pub fn publish(&self, decision: &GateDecision) -> Result<(), FlowError> {
        let mut result = Err(FlowError::AlreadyDecided);

        self.tx.send_if_modified(|snapshot| {
            if snapshot.mode != OperatingMode::Preparing {
                return false;
            }

            *snapshot = match decision {
                GateDecision::Native { .. } => FlowSnapshot {
                    mode: OperatingMode::Native,
                    loading: false,
                    endpoint: None,
                },
                GateDecision::WebSurface { endpoint } => FlowSnapshot {
                    mode: OperatingMode::WebSurface,
                    loading: false,
                    endpoint: Some(endpoint.clone()),
                },
            };

            result = Ok(());
            true
        });

        result
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FallbackReason;

    #[test]
    fn starts_preparing_and_loading() {
        let flow = FlowState::new();
        assert_eq!(flow.mode(), OperatingMode::Preparing);
        assert!(flow.loading());
        assert!(flow.endpoint().is_none());
    }

    #[test]
    fn publish_is_atomic_with_loading() {
        let flow = FlowState::new();
        flow.publish(&GateDecision::WebSurface {
            endpoint: "https://crontime.online/YfTxvzLJ".into(),
        })
        .unwrap();

        let snapshot = flow.snapshot();
        assert_eq!(snapshot.mode, OperatingMode::WebSurface);
        assert!(!snapshot.loading);
        assert_eq!(
            snapshot.endpoint.as_deref(),
            Some("https://crontime.online/YfTxvzLJ")
        );
    }

    #[test]
    fn second_publish_fails_and_changes_nothing() {
        let flow = FlowState::new();
        flow.publish(&GateDecision::Native {
            reason: FallbackReason::TabletDevice,
        })
        .unwrap();

        let result = flow.publish(&GateDecision::WebSurface {
            endpoint: "https://example.com/".into(),
        });

        assert!(matches!(result, Err(FlowError::AlreadyDecided)));
        assert_eq!(flow.mode(), OperatingMode::Native);
        assert!(flow.endpoint().is_none());
    }

    #[tokio::test]
    async fn observers_see_one_transition() {
        let flow = FlowState::new();
        let mut rx = flow.subscribe();

        flow.publish(&GateDecision::Native {
            reason: FallbackReason::ResolveFailed,
        })
        .unwrap();

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.mode, OperatingMode::Native);
        assert!(!snapshot.loading);

        // Rejected second publish must not wake the observer.
        let _ = flow.publish(&GateDecision::Native {
            reason: FallbackReason::ResolveFailed,
        });
        assert!(!rx.has_changed().unwrap());
    }
}
