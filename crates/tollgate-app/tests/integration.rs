//! Integration tests for the tollgate launch flow
//!
//! These tests drive the gate, flow state, and web session together the
//! way the shell does, across simulated process launches (store reopened
//! from the same path each time).

use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;
use tollgate_config::DeviceClass;
use tollgate_core::{
    ActivationGate, FlowState, GateDecision, GateInputs, OperatingMode,
};
use tollgate_store::{CookieRecord, FlagKey, SqliteStore, Store};
use tollgate_surface::{EngineEvent, MockBrowser, RecordingOpener, WebSession};
use url::Url;

const ENDPOINT: &str = "https://crontime.online/YfTxvzLJ";

fn before_activation() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
}

fn after_activation() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
}

fn launch(db_path: &Path, device_class: DeviceClass, now: DateTime<Utc>) -> (GateDecision, FlowState, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open(db_path).unwrap());
    let flow = FlowState::new();
    let gate = ActivationGate::new(store.clone());
    let decision = gate.run(&GateInputs { device_class, now }, &flow);
    (decision, flow, store)
}

#[test]
fn early_launch_latches_native_for_good() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tollgate.db");

    // Launch 1: before the activation threshold.
    let (decision, flow, store) = launch(&db_path, DeviceClass::Phone, before_activation());
    assert!(matches!(decision, GateDecision::Native { .. }));
    assert_eq!(flow.mode(), OperatingMode::Native);
    assert!(store.get_flag(FlagKey::FallbackLatch).unwrap());
    drop(store);

    // Launch 2: the threshold has long passed, but the latch wins.
    let (decision, flow, _store) = launch(&db_path, DeviceClass::Phone, after_activation());
    assert!(matches!(decision, GateDecision::Native { .. }));
    assert_eq!(flow.mode(), OperatingMode::Native);
    assert!(flow.endpoint().is_none());
}

#[test]
fn tablet_never_reaches_web_surface() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tollgate.db");

    let (decision, _flow, _store) = launch(&db_path, DeviceClass::Tablet, after_activation());
    assert!(matches!(decision, GateDecision::Native { .. }));
}

#[tokio::test]
async fn web_surface_launch_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tollgate.db");

    // Launch 1: gate opens, session boots cookie-less, the page sets a
    // cookie, and a finished load snapshots it.
    {
        let (decision, flow, store) = launch(&db_path, DeviceClass::Phone, after_activation());
        assert_eq!(
            decision,
            GateDecision::WebSurface {
                endpoint: ENDPOINT.into()
            }
        );
        assert!(store.get_flag(FlagKey::WebSurfaceShown).unwrap());
        assert!(!store.get_flag(FlagKey::FallbackLatch).unwrap());

        let engine = Arc::new(MockBrowser::new());
        let opener = Arc::new(RecordingOpener::default());
        let session = WebSession::new(
            &flow.endpoint().unwrap(),
            engine.clone(),
            store.clone(),
            opener,
        )
        .unwrap();

        session.start().await.unwrap();
        assert_eq!(engine.loads(), vec![Url::parse(ENDPOINT).unwrap()]);

        engine.put_cookie(CookieRecord::new("session", "abc123"));
        session
            .handle_event(EngineEvent::LoadFinished {
                url: Url::parse(ENDPOINT).unwrap(),
            })
            .await;
    }

    // Launch 2: the saved cookie is restored into the fresh engine before
    // the first navigation.
    {
        let (_decision, flow, store) = launch(&db_path, DeviceClass::Phone, after_activation());
        assert_eq!(flow.mode(), OperatingMode::WebSurface);

        let engine = Arc::new(MockBrowser::new());
        let opener = Arc::new(RecordingOpener::default());
        let session = WebSession::new(
            &flow.endpoint().unwrap(),
            engine.clone(),
            store,
            opener,
        )
        .unwrap();

        session.start().await.unwrap();

        let ops = engine.ops();
        let restore_pos = ops.iter().position(|op| op == "set_cookies").unwrap();
        let load_pos = ops.iter().position(|op| op.starts_with("load ")).unwrap();
        assert!(restore_pos < load_pos);

        let jar = engine.cookie_jar();
        assert_eq!(jar.len(), 1);
        assert_eq!(jar[0].name, "session");
        assert_eq!(jar[0].value, "abc123");
    }
}

#[test]
fn decision_log_accumulates_across_launches() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tollgate.db");

    let (_d, _f, store) = launch(&db_path, DeviceClass::Phone, before_activation());
    drop(store);
    let (_d, _f, store) = launch(&db_path, DeviceClass::Phone, after_activation());

    let records = store.recent_decisions(10).unwrap();
    assert_eq!(records.len(), 2);
}
