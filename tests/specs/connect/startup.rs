//! Connect specs: starting an engine that is not running.

use crate::prelude::*;

#[tokio::test]
async fn absent_port_file_starts_engine_and_stays_checking() {
    let h = Harness::new();

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.launcher.engine_spawns(), 1);
    assert!(h.probe.probes().is_empty(), "must not probe before starting");
    assert_eq!(h.supervisor.status(), EngineStatus::Checking);
    assert_eq!(h.supervisor.last_connected_status(), None);
}

#[tokio::test]
async fn started_engine_is_confirmed_by_port_file_change() {
    let h = Harness::new();
    h.supervisor.connect().await.unwrap();

    h.engine_answers("3.1.32");
    h.watcher.emit(PortFileEvent::Changed).await;

    wait_until(|| h.supervisor.status().is_connected()).await;
    assert_eq!(
        h.statuses(),
        vec![ConnectionStatus::Checking, ConnectionStatus::Connected]
    );
}

#[tokio::test]
async fn stale_port_file_without_process_starts_engine_once() {
    let h = Harness::new();
    h.write_port_file();

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.launcher.engine_spawns(), 1);
    assert!(h.processes.kills().is_empty());
    assert!(h.probe.probes().is_empty());
}

#[tokio::test]
async fn engine_is_started_from_its_recorded_path() {
    let h = Harness::new();

    h.supervisor.connect().await.unwrap();

    assert_eq!(
        h.launcher.calls(),
        vec![LaunchCall::SpawnEngine { path: h.exe() }]
    );
    let executable = h.supervisor.engine_executable().unwrap();
    assert_eq!(executable.dir, h.engine_dir());
}
