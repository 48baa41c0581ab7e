//! Connect specs: failures and how they surface.

use crate::prelude::*;

#[tokio::test]
async fn missing_install_is_not_installed() {
    let h = Harness::new();
    h.resolver.set_path(None);

    let err = h.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotInstalled));
    assert_eq!(h.supervisor.status(), EngineStatus::Disconnected);
}

#[tokio::test]
async fn vanished_executable_is_not_installed() {
    let h = Harness::new();
    std::fs::remove_file(h.exe()).unwrap();

    let err = h.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotInstalled));
    assert!(err.to_string().contains(ENGINE_EXE));
}

#[tokio::test]
async fn disabled_auto_start_reports_not_started() {
    let h = Harness::with_options(ConnectorOptions {
        auto_start: Some(AutoStart {
            on_connect: false,
            on_suspend: false,
        }),
        ..ConnectorOptions::default()
    });

    let err = h.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotStarted));
    assert_eq!(h.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn failed_launch_reports_run_fail() {
    let h = Harness::new();
    h.launcher.set_engine_fails(true);

    let err = h.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineRunFail));
}

#[tokio::test]
async fn every_status_update_is_announced() {
    let h = Harness::new();
    h.resolver.set_path(None);
    let _ = h.supervisor.connect().await;
    h.resolver.set_path(Some(h.exe()));
    h.engine_running(3);
    h.engine_answers("3.1.32");
    h.supervisor.connect().await.unwrap();

    assert_eq!(
        h.statuses(),
        vec![
            ConnectionStatus::Checking,
            ConnectionStatus::Disconnected,
            ConnectionStatus::Checking,
            ConnectionStatus::Connected,
        ]
    );
    assert_eq!(h.supervisor.status().connection_status(), ConnectionStatus::Connected);
}

#[test]
fn other_platforms_are_rejected() {
    let result = Supervisor::new(
        ConnectorOptions::default(),
        SupervisorDeps {
            resolver: FakePathResolver::new(),
            processes: FakeProcessAdapter::new(),
            probe: FakeHealthProbe::new(),
            transfer: FakeTransfer::new(),
            launcher: FakeLauncher::new(),
            watcher: FakePortWatcher::new(),
            platform: HostPlatform::Linux,
        },
        spec_config(),
    );
    assert!(result.is_err());
}
