// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor tests

mod connect;
mod install;
mod patch;
mod watch;

use super::*;
use crate::test_helpers::{setup, setup_with_options, test_config, TestContext};
use ace_adapters::{
    FakeHealthProbe, FakeLauncher, FakePathResolver, FakePortWatcher, FakeProcessAdapter,
    FakeTransfer, ProcessCall,
};
use ace_core::ConnectionStatus;
use yare::parameterized;

#[parameterized(
    linux = { HostPlatform::Linux },
    macos = { HostPlatform::MacOs },
    other = { HostPlatform::Other },
)]
fn construction_fails_off_windows(platform: HostPlatform) {
    let result = Supervisor::new(
        ConnectorOptions::default(),
        SupervisorDeps {
            resolver: FakePathResolver::new(),
            processes: FakeProcessAdapter::new(),
            probe: FakeHealthProbe::new(),
            transfer: FakeTransfer::new(),
            launcher: FakeLauncher::new(),
            watcher: FakePortWatcher::new(),
            platform,
        },
        test_config(),
    );
    assert!(matches!(
        result,
        Err(SupervisorError::UnsupportedPlatform(p)) if p == platform
    ));
}

#[test]
fn initial_status_is_disconnected_with_no_stable_history() {
    let ctx = setup();
    assert_eq!(ctx.supervisor.status(), EngineStatus::Disconnected);
    assert_eq!(ctx.supervisor.last_connected_status(), None);
    assert_eq!(ctx.supervisor.engine_executable(), None);
    assert!(ctx.log.lock().is_empty());
}

#[tokio::test]
async fn http_check_success_sets_connected_with_version() {
    let ctx = setup();
    ctx.probe.set_version(Some("3.1.32"));

    assert!(ctx.supervisor.check_http_connection().await);
    assert_eq!(ctx.supervisor.status(), EngineStatus::connected("3.1.32"));
    assert_eq!(
        ctx.supervisor.last_connected_status(),
        Some(StableStatus::Connected)
    );
    assert_eq!(ctx.probe.probes(), vec![ctx.supervisor.options().http_port]);
}

#[tokio::test]
async fn http_check_failure_sets_disconnected_without_error() {
    let ctx = setup();

    assert!(!ctx.supervisor.check_http_connection().await);
    assert_eq!(ctx.supervisor.status(), EngineStatus::Disconnected);
    assert_eq!(
        ctx.supervisor.last_connected_status(),
        Some(StableStatus::Disconnected)
    );
    assert_eq!(ctx.statuses(), vec![ConnectionStatus::Disconnected]);
}

#[tokio::test]
async fn http_check_uses_configured_port() {
    let ctx = setup_with_options(ConnectorOptions {
        http_port: 7000,
        ..ConnectorOptions::default()
    });
    ctx.supervisor.check_http_connection().await;
    assert_eq!(ctx.probe.probes(), vec![7000]);
}

#[tokio::test]
async fn last_connected_survives_checking() {
    let ctx = setup();
    ctx.engine_running(10);
    ctx.probe.set_version(Some("3.1.32"));
    ctx.supervisor.connect().await.unwrap();

    ctx.supervisor.update_status(EngineStatus::Checking);
    assert_eq!(ctx.supervisor.status(), EngineStatus::Checking);
    assert_eq!(
        ctx.supervisor.last_connected_status(),
        Some(StableStatus::Connected)
    );
}

#[tokio::test]
async fn disconnect_without_process_returns_false_and_keeps_status() {
    let ctx = setup();
    ctx.probe.set_version(Some("3.1.32"));
    ctx.supervisor.check_http_connection().await;
    let before = ctx.log.lock().len();

    assert!(!ctx.supervisor.disconnect().await.unwrap());
    assert_eq!(ctx.supervisor.status(), EngineStatus::connected("3.1.32"));
    assert_eq!(ctx.log.lock().len(), before);
    assert!(ctx.processes.kills().is_empty());
}

#[tokio::test]
async fn disconnect_kills_engine_and_closes_watcher() {
    let ctx = setup();
    ctx.engine_running(77);
    ctx.probe.set_version(Some("3.1.32"));
    ctx.supervisor.connect().await.unwrap();
    assert_eq!(ctx.watcher.open_handles(), 1);

    assert!(ctx.supervisor.disconnect().await.unwrap());
    assert_eq!(ctx.processes.kills(), vec![77]);
    assert_eq!(ctx.watcher.open_handles(), 0);
    assert_eq!(ctx.supervisor.status(), EngineStatus::Disconnected);
    assert_eq!(ctx.statuses().last(), Some(&ConnectionStatus::Disconnected));
}

#[tokio::test]
async fn disconnect_before_connect_resolves_executable() {
    let ctx = setup();
    ctx.processes.add_process(5, "ACE_ENGINE.EXE");

    assert!(ctx.supervisor.disconnect().await.unwrap());
    assert_eq!(ctx.resolver.lookups(), 1);
    assert_eq!(
        ctx.processes.calls(),
        vec![
            ProcessCall::FindByName {
                name: "ace_engine.exe".to_string()
            },
            ProcessCall::Kill { pid: 5 },
        ]
    );
}

#[tokio::test]
async fn disconnect_when_not_installed_returns_false() {
    let ctx = setup();
    ctx.resolver.set_path(None);
    assert!(!ctx.supervisor.disconnect().await.unwrap());
    assert!(ctx.processes.calls().is_empty());
}

#[tokio::test]
async fn notifications_channel_mirrors_observers() {
    let ctx = setup();
    let mut rx = ctx.supervisor.notifications();
    ctx.probe.set_version(Some("3.1.32"));
    ctx.supervisor.check_http_connection().await;

    match rx.recv().await {
        Some(Notification::UpdateStatus(status)) => {
            assert_eq!(status, EngineStatus::connected("3.1.32"))
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unsubscribed_observer_stops_receiving() {
    let ctx: TestContext = setup();
    let id = ctx.supervisor.subscribe(|_: &Notification| {});
    assert!(ctx.supervisor.unsubscribe(id));
    assert!(!ctx.supervisor.unsubscribe(id));
}
