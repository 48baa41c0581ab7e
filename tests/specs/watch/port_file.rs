//! Port file specs: reacting to the engine's liveness marker.

use crate::prelude::*;

fn restart_disabled() -> ConnectorOptions {
    ConnectorOptions {
        auto_start: Some(AutoStart {
            on_connect: true,
            on_suspend: false,
        }),
        ..ConnectorOptions::default()
    }
}

async fn connected(h: &Harness) {
    h.engine_running(500);
    h.engine_answers("3.1.32");
    h.supervisor.connect().await.unwrap();
    assert!(h.supervisor.status().is_connected());
}

#[tokio::test]
async fn removal_disconnects_immediately() {
    let h = Harness::with_options(restart_disabled());
    connected(&h).await;

    h.watcher.emit(PortFileEvent::Removed).await;

    wait_until(|| h.supervisor.status() == EngineStatus::Disconnected).await;
    assert_eq!(
        h.supervisor.last_connected_status(),
        Some(StableStatus::Disconnected)
    );
}

#[tokio::test]
async fn removal_with_restart_reconnects() {
    let h = Harness::new();
    connected(&h).await;
    std::fs::remove_file(h.port_file()).unwrap();

    h.watcher.emit(PortFileEvent::Removed).await;

    wait_until(|| h.launcher.engine_spawns() == 1).await;
    assert_eq!(h.watcher.open_handles(), 1);
    assert_eq!(
        h.statuses(),
        vec![
            ConnectionStatus::Checking,
            ConnectionStatus::Connected,
            ConnectionStatus::Disconnected,
            ConnectionStatus::Checking,
        ]
    );
}

#[tokio::test]
async fn burst_of_removals_reconnects_once() {
    let mut config = spec_config();
    config.timing.reconnect_delay = Duration::from_millis(100);
    let h = Harness::with(ConnectorOptions::default(), config);
    connected(&h).await;
    std::fs::remove_file(h.port_file()).unwrap();

    for _ in 0..3 {
        h.watcher.emit(PortFileEvent::Removed).await;
    }

    wait_until(|| h.launcher.engine_spawns() == 1).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(h.launcher.engine_spawns(), 1);
    assert_eq!(h.resolver.lookups(), 2);
}

#[tokio::test]
async fn disconnect_cancels_scheduled_reconnect() {
    let mut config = spec_config();
    config.timing.reconnect_delay = Duration::from_millis(100);
    let h = Harness::with(ConnectorOptions::default(), config);
    connected(&h).await;

    h.watcher.emit(PortFileEvent::Removed).await;
    wait_until(|| h.supervisor.status() == EngineStatus::Disconnected).await;
    assert!(h.supervisor.disconnect().await.unwrap());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(h.resolver.lookups(), 1);
    assert_eq!(h.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn port_change_reprobes() {
    let h = Harness::with_options(restart_disabled());
    connected(&h).await;

    h.probe.set_version(None);
    h.watcher.emit(PortFileEvent::Changed).await;
    wait_until(|| h.supervisor.status() == EngineStatus::Disconnected).await;

    h.engine_answers("3.1.33");
    h.watcher.emit(PortFileEvent::Changed).await;
    wait_until(|| h.supervisor.status().version() == Some("3.1.33")).await;
    assert_eq!(h.probe.probes().len(), 3);
}

#[tokio::test]
async fn null_auto_start_never_watches() {
    let h = Harness::with_options(ConnectorOptions {
        auto_start: None,
        ..ConnectorOptions::default()
    });
    h.engine_running(500);
    h.engine_answers("3.1.32");

    h.supervisor.connect().await.unwrap();

    assert!(h.watcher.watch_calls().is_empty());
    assert!(h.supervisor.status().is_connected());
}
