// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{setup_with, ASSET_BASE, ENGINE_EXE};
use crate::ConnectionErrorKind;
use ace_adapters::LaunchCall;
use ace_core::AutoStart;
use serial_test::serial;

#[tokio::test]
async fn no_port_file_starts_engine_without_probing() {
    let ctx = setup();

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(
        ctx.launcher.calls(),
        vec![LaunchCall::SpawnEngine {
            path: ctx.exe_path()
        }]
    );
    assert!(ctx.probe.probes().is_empty());
    assert!(ctx.processes.calls().is_empty());
    assert_eq!(ctx.supervisor.status(), EngineStatus::Checking);
    assert_eq!(ctx.statuses(), vec![ConnectionStatus::Checking]);
    assert_eq!(ctx.supervisor.last_connected_status(), None);
}

#[tokio::test]
async fn running_reachable_engine_is_left_alone() {
    let ctx = setup();
    ctx.engine_running(42);
    ctx.probe.set_version(Some("3.1.32"));

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(ctx.supervisor.status(), EngineStatus::connected("3.1.32"));
    assert_eq!(
        ctx.statuses(),
        vec![ConnectionStatus::Checking, ConnectionStatus::Connected]
    );
    assert!(ctx.processes.kills().is_empty());
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn unreachable_engine_is_killed_and_restarted() {
    let ctx = setup();
    ctx.engine_running(42);

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(ctx.probe.probes().len(), 1);
    assert_eq!(ctx.processes.kills(), vec![42]);
    assert_eq!(ctx.launcher.engine_spawns(), 1);
}

#[tokio::test]
async fn stale_port_file_starts_engine_once() {
    let ctx = setup();
    ctx.write_port_file();

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(
        ctx.processes.calls(),
        vec![ProcessCall::FindByName {
            name: ENGINE_EXE.to_string()
        }]
    );
    assert!(ctx.probe.probes().is_empty());
    assert_eq!(ctx.launcher.engine_spawns(), 1);
}

#[tokio::test]
async fn records_executable_and_directory() {
    let ctx = setup();
    ctx.supervisor.connect().await.unwrap();

    let executable = ctx.supervisor.engine_executable().unwrap();
    assert_eq!(executable.path, ctx.exe_path());
    assert_eq!(executable.dir, ctx.engine_dir.path());
}

#[tokio::test]
async fn explicit_path_skips_resolver() {
    let ctx = setup_with_options(ConnectorOptions {
        ace_engine_executable_path: Some(std::path::PathBuf::from("placeholder")),
        ..ConnectorOptions::default()
    });
    // The explicit path does not exist, so this fails without asking the resolver.
    let err = ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotInstalled));
    assert!(err.to_string().contains("placeholder"));
    assert_eq!(ctx.resolver.lookups(), 0);
}

#[parameterized(
    no_registry_value = { None, None },
    lookup_error = { None, Some("reg query timed out") },
    missing_file = { Some("C:/nowhere/ace_engine.exe"), None },
)]
fn not_installed_fails_and_reports_disconnected(path: Option<&str>, error: Option<&str>) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let ctx = setup();
        ctx.resolver.set_path(path.map(std::path::PathBuf::from));
        ctx.resolver.set_error(error);

        let err = ctx.supervisor.connect().await.unwrap_err();

        assert!(matches!(err, ConnectError::EngineNotInstalled(_)));
        assert_eq!(ctx.launcher.calls(), vec![]);
        assert_eq!(
            ctx.statuses(),
            vec![ConnectionStatus::Checking, ConnectionStatus::Disconnected]
        );
        assert_eq!(ctx.supervisor.engine_executable(), None);
    });
}

#[tokio::test]
async fn explicit_path_without_file_name_is_not_installed() {
    let ctx = setup_with_options(ConnectorOptions {
        ace_engine_executable_path: Some(std::path::PathBuf::from("/")),
        ..ConnectorOptions::default()
    });
    ctx.write_port_file();

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotInstalled));
    assert!(ctx.processes.calls().is_empty());
    assert!(ctx.processes.kills().is_empty());
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn auto_start_disabled_fails_with_not_started() {
    let ctx = setup_with_options(ConnectorOptions {
        auto_start: Some(AutoStart {
            on_connect: false,
            on_suspend: true,
        }),
        ..ConnectorOptions::default()
    });

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotStarted));
    assert_eq!(ctx.launcher.engine_spawns(), 0);
    assert_eq!(ctx.supervisor.status(), EngineStatus::Disconnected);
}

#[tokio::test]
async fn launch_failure_is_run_fail() {
    let ctx = setup();
    ctx.launcher.set_engine_fails(true);

    let err = ctx.supervisor.connect().await.unwrap_err();
    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineRunFail));
}

#[tokio::test]
async fn process_listing_failure_propagates() {
    let ctx = setup();
    ctx.write_port_file();
    ctx.processes.set_list_error(Some("access denied"));

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert!(matches!(err, ConnectError::Process(_)));
    assert_eq!(err.kind(), None);
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn watch_failure_propagates() {
    let ctx = setup();
    ctx.watcher.set_fails(true);

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert!(matches!(err, ConnectError::Watch(_)));
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn repeated_connects_keep_one_watcher() {
    let ctx = setup();
    for _ in 0..4 {
        ctx.supervisor.connect().await.unwrap();
        assert_eq!(ctx.watcher.open_handles(), 1);
    }
    assert_eq!(ctx.watcher.watch_calls().len(), 4);
    assert_eq!(
        ctx.watcher.watch_calls()[0],
        (ctx.engine_dir.path().to_path_buf(), "acestream.port".to_string())
    );
}

#[tokio::test]
async fn null_auto_start_disables_watching() {
    let ctx = setup_with_options(ConnectorOptions {
        auto_start: None,
        ..ConnectorOptions::default()
    });

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotStarted));
    assert!(ctx.watcher.watch_calls().is_empty());
}

#[tokio::test]
async fn concurrent_connects_are_queued() {
    let ctx = setup();
    let a = ctx.supervisor.clone();
    let b = ctx.supervisor.clone();

    let (first, second) = tokio::join!(a.connect(), b.connect());
    first.unwrap();
    second.unwrap();

    assert_eq!(ctx.launcher.engine_spawns(), 2);
    assert_eq!(ctx.watcher.open_handles(), 1);
    assert_eq!(
        ctx.statuses(),
        vec![ConnectionStatus::Checking, ConnectionStatus::Checking]
    );
}

#[tokio::test]
async fn not_installed_without_auto_install_does_not_install() {
    let ctx = setup();
    ctx.resolver.set_path(None);

    ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(ctx.launcher.installer_runs(), 0);
    assert!(ctx.transfer.calls().is_empty());
    assert_eq!(ctx.count("beforeInstall"), 0);
}

#[tokio::test]
#[serial(installer)]
async fn auto_install_then_retries_once() {
    let options = ConnectorOptions {
        auto_install: true,
        ..ConnectorOptions::default()
    };
    let ctx = setup_with(options, test_config());
    ctx.resolver.set_path(None);
    ctx.transfer
        .set_text(&format!("{ASSET_BASE}/installer"), "https://cdn.test/setup.exe");
    ctx.transfer.set_file("https://cdn.test/setup.exe", b"MZ installer");

    // The installer "installs" the engine by making the resolver find it.
    let resolver = ctx.resolver.clone();
    let exe = ctx.exe_path();
    ctx.supervisor.subscribe(move |n: &Notification| {
        if matches!(n, Notification::InstallComplete) {
            resolver.set_path(Some(exe.clone()));
        }
    });
    let installer = std::env::temp_dir().join(INSTALLER_FILE_NAME);
    let _ = std::fs::remove_file(&installer);

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(
        ctx.launcher.calls(),
        vec![
            LaunchCall::RunInstaller {
                path: installer.clone()
            },
            LaunchCall::SpawnEngine {
                path: ctx.exe_path()
            },
        ]
    );
    assert_eq!(ctx.resolver.lookups(), 2);
    let _ = std::fs::remove_file(&installer);
}

#[tokio::test]
#[serial(installer)]
async fn auto_install_second_failure_propagates() {
    let options = ConnectorOptions {
        auto_install: true,
        ..ConnectorOptions::default()
    };
    let ctx = setup_with(options, test_config());
    ctx.resolver.set_path(None);
    let installer = std::env::temp_dir().join(INSTALLER_FILE_NAME);
    std::fs::write(&installer, b"MZ installer").unwrap();

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ConnectionErrorKind::EngineNotInstalled));
    assert_eq!(ctx.launcher.installer_runs(), 1);
    assert_eq!(ctx.resolver.lookups(), 2);
    let _ = std::fs::remove_file(&installer);
}

#[tokio::test]
#[serial(installer)]
async fn auto_install_download_failure_is_install_error() {
    let options = ConnectorOptions {
        auto_install: true,
        ..ConnectorOptions::default()
    };
    let ctx = setup_with(options, test_config());
    ctx.resolver.set_path(None);
    let installer = std::env::temp_dir().join(INSTALLER_FILE_NAME);
    let _ = std::fs::remove_file(&installer);

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert_eq!(
        err.kind(),
        Some(ConnectionErrorKind::Install(ace_core::InstallStep::Download))
    );
    assert_eq!(ctx.resolver.lookups(), 1);
    assert_eq!(ctx.supervisor.status(), EngineStatus::Disconnected);
}
