// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the connector crate.

use crate::observer::Notification;
use crate::{ConnectorOptions, Supervisor, SupervisorConfig, SupervisorDeps, Timing};
use ace_adapters::{
    FakeHealthProbe, FakeLauncher, FakePathResolver, FakePortWatcher, FakeProcessAdapter,
    FakeTransfer,
};
use ace_core::{AssetConfig, ConnectionStatus, HostPlatform};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Convenience alias for the fully-faked supervisor.
pub(crate) type TestSupervisor = Supervisor<
    FakePathResolver,
    FakeProcessAdapter,
    FakeHealthProbe,
    FakeTransfer,
    FakeLauncher,
    FakePortWatcher,
>;

pub(crate) const ENGINE_EXE: &str = "ace_engine.exe";
pub(crate) const ASSET_BASE: &str = "https://assets.test/links";

pub(crate) fn test_config() -> SupervisorConfig {
    SupervisorConfig {
        assets: AssetConfig {
            base_url: ASSET_BASE.to_string(),
            ..AssetConfig::default()
        },
        timing: Timing::immediate(),
    }
}

/// Supervisor, its fakes, an engine directory and a notification log.
pub(crate) struct TestContext {
    pub supervisor: TestSupervisor,
    pub resolver: FakePathResolver,
    pub processes: FakeProcessAdapter,
    pub probe: FakeHealthProbe,
    pub transfer: FakeTransfer,
    pub launcher: FakeLauncher,
    pub watcher: FakePortWatcher,
    pub engine_dir: TempDir,
    pub log: Arc<Mutex<Vec<Notification>>>,
}

pub(crate) fn setup() -> TestContext {
    setup_with(ConnectorOptions::default(), test_config())
}

pub(crate) fn setup_with_options(options: ConnectorOptions) -> TestContext {
    setup_with(options, test_config())
}

pub(crate) fn setup_with(options: ConnectorOptions, config: SupervisorConfig) -> TestContext {
    let engine_dir = tempfile::tempdir().unwrap();
    let exe = engine_dir.path().join(ENGINE_EXE);
    std::fs::write(&exe, b"engine").unwrap();

    let resolver = FakePathResolver::with_path(exe.clone());
    let processes = FakeProcessAdapter::new();
    let probe = FakeHealthProbe::new();
    let transfer = FakeTransfer::new();
    let launcher = FakeLauncher::new();
    let watcher = FakePortWatcher::new();

    let supervisor = Supervisor::new(
        options,
        SupervisorDeps {
            resolver: resolver.clone(),
            processes: processes.clone(),
            probe: probe.clone(),
            transfer: transfer.clone(),
            launcher: launcher.clone(),
            watcher: watcher.clone(),
            platform: HostPlatform::Windows,
        },
        config,
    )
    .unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    supervisor.subscribe(move |n: &Notification| sink.lock().push(n.clone()));

    TestContext {
        supervisor,
        resolver,
        processes,
        probe,
        transfer,
        launcher,
        watcher,
        engine_dir,
        log,
    }
}

impl TestContext {
    pub fn exe_path(&self) -> PathBuf {
        self.engine_dir.path().join(ENGINE_EXE)
    }

    pub fn write_port_file(&self) {
        std::fs::write(self.engine_dir.path().join("acestream.port"), "6878").unwrap();
    }

    /// Mark the engine as running: port file on disk and a matching process
    pub fn engine_running(&self, pid: u32) {
        self.write_port_file();
        self.processes.add_process(pid, ENGINE_EXE);
    }

    /// Names of all notifications so far
    pub fn names(&self) -> Vec<&'static str> {
        self.log.lock().iter().map(Notification::name).collect()
    }

    /// Statuses announced so far
    pub fn statuses(&self) -> Vec<ConnectionStatus> {
        self.log
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::UpdateStatus(status) => Some(status.connection_status()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().iter().filter(|n| **n == name).count()
    }
}

/// Poll `condition` until it holds, yielding to background tasks.
pub(crate) async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met in time");
}
