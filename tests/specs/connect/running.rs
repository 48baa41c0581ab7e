//! Connect specs: an engine that is already running.

use crate::prelude::*;

#[tokio::test]
async fn reachable_engine_connects_without_restart() {
    let h = Harness::new();
    h.engine_running(1200);
    h.engine_answers("3.1.32");

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.supervisor.status(), EngineStatus::connected("3.1.32"));
    assert_eq!(
        h.supervisor.last_connected_status(),
        Some(StableStatus::Connected)
    );
    assert!(h.processes.kills().is_empty());
    assert_eq!(h.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn unresponsive_engine_is_replaced() {
    let h = Harness::new();
    h.engine_running(1200);

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.processes.kills(), vec![1200]);
    assert_eq!(h.launcher.engine_spawns(), 1);
}

#[tokio::test]
async fn disconnect_stops_engine() {
    let h = Harness::new();
    h.engine_running(1200);
    h.engine_answers("3.1.32");
    h.supervisor.connect().await.unwrap();

    assert!(h.supervisor.disconnect().await.unwrap());

    assert_eq!(h.processes.kills(), vec![1200]);
    assert_eq!(h.watcher.open_handles(), 0);
    assert_eq!(h.supervisor.status(), EngineStatus::Disconnected);
}

#[tokio::test]
async fn disconnect_with_nothing_running_changes_nothing() {
    let h = Harness::new();

    assert!(!h.supervisor.disconnect().await.unwrap());

    assert!(h.notifications().is_empty());
    assert_eq!(h.supervisor.status(), EngineStatus::Disconnected);
    assert_eq!(h.supervisor.last_connected_status(), None);
}

#[tokio::test]
async fn many_connects_hold_a_single_watcher() {
    let h = Harness::new();
    h.engine_running(1200);
    h.engine_answers("3.1.32");

    for _ in 0..5 {
        h.supervisor.connect().await.unwrap();
    }

    assert_eq!(h.watcher.open_handles(), 1);
    assert_eq!(h.watcher.watch_calls().len(), 5);
}
