//! Activation gate
//!
//! One evaluation per process, at launch. The predicates short-circuit in
//! a fixed order and every failure mode degrades to native mode; nothing
//! here surfaces an error to the user.
//!
//! The fallback latch is one-way: any native resolution persists it, and
//! from then on step 2 resolves native on every future launch. The tablet
//! and temporal predicates are still re-evaluated by value each launch,
//! but once the latch is set they are masked by it. That masking is
//! preserved deliberately; see DESIGN.md.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tollgate_config::{DeviceClass, resolve_activation_threshold, resolve_endpoint};
use tollgate_store::{DecisionEvent, DecisionRecord, FlagKey, Store};
use tracing::{debug, info, warn};

use crate::FlowState;

/// Inputs captured once per evaluation. Immutable.
#[derive(Debug, Clone, Copy)]
pub struct GateInputs {
    pub device_class: DeviceClass,
    pub now: DateTime<Utc>,
}

impl GateInputs {
    /// Capture inputs at the current time.
    pub fn capture(device_class: DeviceClass) -> Self {
        Self {
            device_class,
            now: tollgate_util::now(),
        }
    }
}

/// Structured reason codes for a native-mode resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Tablet-class devices never get the web surface
    TabletDevice,

    /// The persisted fallback latch is set
    FallbackLatched,

    /// Current time is before the activation threshold (or the threshold
    /// failed to resolve)
    BeforeActivation,

    /// The endpoint blob failed to decode
    ResolveFailed,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::TabletDevice => "tablet_device",
            FallbackReason::FallbackLatched => "fallback_latched",
            FallbackReason::BeforeActivation => "before_activation",
            FallbackReason::ResolveFailed => "resolve_failed",
        }
    }
}

/// Terminal decision of one gate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Native { reason: FallbackReason },
    WebSurface { endpoint: String },
}

/// The activation gate
pub struct ActivationGate {
    store: Arc<dyn Store>,
}

impl ActivationGate {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Evaluate the gate predicates. Short-circuiting, first match wins.
    ///
    /// Read failures on the latch count as "not latched"; an unresolvable
    /// threshold counts as "not yet reached". Both degrade to native.
    pub fn evaluate(&self, inputs: &GateInputs) -> GateDecision {
        if inputs.device_class == DeviceClass::Tablet {
            debug!("Tablet device, staying native");
            return GateDecision::Native {
                reason: FallbackReason::TabletDevice,
            };
        }

        let latched = match self.store.get_flag(FlagKey::FallbackLatch) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Fallback latch unreadable, treating as unset");
                false
            }
        };
        if latched {
            debug!("Fallback latch set, staying native");
            return GateDecision::Native {
                reason: FallbackReason::FallbackLatched,
            };
        }

        match resolve_activation_threshold() {
            Some(threshold) if inputs.now >= threshold => {}
            Some(threshold) => {
                debug!(%threshold, now = %inputs.now, "Before activation threshold");
                return GateDecision::Native {
                    reason: FallbackReason::BeforeActivation,
                };
            }
            None => {
                debug!("Activation threshold unresolvable");
                return GateDecision::Native {
                    reason: FallbackReason::BeforeActivation,
                };
            }
        }

        match resolve_endpoint() {
            Some(endpoint) => GateDecision::WebSurface { endpoint },
            None => GateDecision::Native {
                reason: FallbackReason::ResolveFailed,
            },
        }
    }

    /// Run the gate: evaluate, persist the sticky state, publish the
    /// decision into flow state.
    ///
    /// Store write failures are logged and swallowed; the in-process
    /// decision stands either way.
    pub fn run(&self, inputs: &GateInputs, flow: &FlowState) -> GateDecision {
        let decision = self.evaluate(inputs);

        match &decision {
            GateDecision::Native { reason } => {
                // One-way latch. Never cleared by the app.
                if let Err(e) = self.store.set_flag(FlagKey::FallbackLatch, true) {
                    warn!(error = %e, "Failed to persist fallback latch");
                }
                let _ = self.store.append_decision(DecisionRecord::new(
                    DecisionEvent::Native {
                        reason: reason.as_str().into(),
                    },
                ));
                info!(reason = reason.as_str(), "Native mode activated");
            }
            GateDecision::WebSurface { endpoint } => {
                if let Err(e) = self.store.set_flag(FlagKey::WebSurfaceShown, true) {
                    warn!(error = %e, "Failed to persist web-surface marker");
                }
                let _ = self.store.append_decision(DecisionRecord::new(
                    DecisionEvent::WebSurface {
                        endpoint: endpoint.clone(),
                    },
                ));
                info!(endpoint = %endpoint, "Web-surface mode activated");
            }
        }

        if let Err(e) = flow.publish(&decision) {
            warn!(error = %e, "Gate ran twice in one process, keeping first decision");
        }

        decision
    }
}
