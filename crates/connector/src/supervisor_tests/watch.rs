// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{setup_with, wait_for};
use ace_adapters::PortFileEvent;
use ace_core::AutoStart;
use std::time::Duration;

fn slow_reconnect_config() -> SupervisorConfig {
    let mut config = test_config();
    config.timing.reconnect_delay = Duration::from_secs(3600);
    config
}

fn no_restart() -> ConnectorOptions {
    ConnectorOptions {
        auto_start: Some(AutoStart {
            on_connect: true,
            on_suspend: false,
        }),
        ..ConnectorOptions::default()
    }
}

#[tokio::test]
async fn changed_event_probes_and_connects() {
    let ctx = setup();
    ctx.supervisor.connect().await.unwrap();
    assert_eq!(ctx.supervisor.status(), EngineStatus::Checking);

    ctx.probe.set_version(Some("3.1.32"));
    ctx.watcher.emit(PortFileEvent::Changed).await;

    wait_for(|| ctx.supervisor.status().is_connected()).await;
    assert_eq!(ctx.supervisor.status().version(), Some("3.1.32"));
    assert_eq!(
        ctx.statuses(),
        vec![ConnectionStatus::Checking, ConnectionStatus::Connected]
    );
}

#[tokio::test]
async fn changed_event_with_unreachable_engine_disconnects() {
    let ctx = setup();
    ctx.supervisor.connect().await.unwrap();

    ctx.watcher.emit(PortFileEvent::Changed).await;

    wait_for(|| ctx.statuses().len() == 2).await;
    assert_eq!(ctx.supervisor.status(), EngineStatus::Disconnected);
}

#[tokio::test]
async fn removed_event_disconnects_without_restart() {
    let ctx = setup_with_options(no_restart());
    ctx.engine_running(9);
    ctx.probe.set_version(Some("3.1.32"));
    ctx.supervisor.connect().await.unwrap();

    ctx.watcher.emit(PortFileEvent::Removed).await;

    wait_for(|| ctx.supervisor.status() == EngineStatus::Disconnected).await;
    assert!(ctx.supervisor.inner.state.lock().reconnect.is_none());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ctx.resolver.lookups(), 1);
}

#[tokio::test]
async fn removed_event_reconnects_after_delay() {
    let ctx = setup();
    ctx.supervisor.connect().await.unwrap();
    assert_eq!(ctx.launcher.engine_spawns(), 1);

    ctx.watcher.emit(PortFileEvent::Removed).await;

    wait_for(|| ctx.launcher.engine_spawns() == 2).await;
    assert_eq!(ctx.watcher.open_handles(), 1);
    assert_eq!(
        ctx.statuses(),
        vec![
            ConnectionStatus::Checking,
            ConnectionStatus::Disconnected,
            ConnectionStatus::Checking,
        ]
    );
    assert!(ctx.supervisor.inner.state.lock().reconnect.is_none());
}

#[tokio::test]
async fn repeated_removals_keep_one_pending_reconnect() {
    let ctx = setup_with(ConnectorOptions::default(), slow_reconnect_config());
    ctx.supervisor.connect().await.unwrap();

    for _ in 0..3 {
        ctx.watcher.emit(PortFileEvent::Removed).await;
    }
    wait_for(|| ctx.statuses().len() == 4).await;

    let state = ctx.supervisor.inner.state.lock();
    let pending = state.reconnect.as_ref().unwrap();
    assert_eq!(pending.generation, state.generation);
}

#[tokio::test]
async fn new_connect_cancels_pending_reconnect() {
    let ctx = setup_with(ConnectorOptions::default(), slow_reconnect_config());
    ctx.supervisor.connect().await.unwrap();
    ctx.watcher.emit(PortFileEvent::Removed).await;
    wait_for(|| ctx.supervisor.inner.state.lock().reconnect.is_some()).await;
    let before = ctx.supervisor.inner.state.lock().generation;

    ctx.supervisor.connect().await.unwrap();

    let state = ctx.supervisor.inner.state.lock();
    assert!(state.reconnect.is_none());
    assert_eq!(state.generation, before + 1);
}

#[tokio::test]
async fn disconnect_cancels_pending_reconnect() {
    let ctx = setup_with(ConnectorOptions::default(), slow_reconnect_config());
    ctx.supervisor.connect().await.unwrap();
    ctx.watcher.emit(PortFileEvent::Removed).await;
    wait_for(|| ctx.supervisor.inner.state.lock().reconnect.is_some()).await;

    ctx.processes.add_process(31, "ace_engine.exe");
    assert!(ctx.supervisor.disconnect().await.unwrap());

    let state = ctx.supervisor.inner.state.lock();
    assert!(state.reconnect.is_none());
    assert!(state.watcher.is_none());
}

#[tokio::test]
async fn stale_generation_does_not_schedule() {
    let ctx = setup_with(ConnectorOptions::default(), slow_reconnect_config());
    ctx.supervisor.connect().await.unwrap();
    let stale = ctx.supervisor.inner.state.lock().generation;
    ctx.supervisor.connect().await.unwrap();

    ctx.supervisor.schedule_reconnect(stale);

    assert!(ctx.supervisor.inner.state.lock().reconnect.is_none());
}

#[tokio::test]
async fn events_stop_after_supervisor_is_dropped() {
    let ctx = setup();
    ctx.supervisor.connect().await.unwrap();
    let TestContext {
        supervisor,
        watcher,
        probe,
        ..
    } = ctx;

    drop(supervisor);
    assert_eq!(watcher.open_handles(), 0);
    watcher.emit(PortFileEvent::Changed).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(probe.probes().is_empty());
}
