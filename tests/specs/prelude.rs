//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL around a fully-faked supervisor.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub use ace_adapters::{
    FakeHealthProbe, FakeLauncher, FakePathResolver, FakePortWatcher, FakeProcessAdapter,
    FakeTransfer, LaunchCall, PortFileEvent, ProcessCall,
};
pub use ace_connector::{
    AssetConfig, AutoStart, ConnectError, ConnectionErrorKind, ConnectionStatus,
    ConnectorOptions, EngineStatus, HostPlatform, InstallStep, Notification, StableStatus,
    Supervisor, SupervisorConfig, SupervisorDeps, Timing,
};
pub use std::path::{Path, PathBuf};
pub use std::time::Duration;

use std::sync::{Arc, Mutex};

// Spec polling
pub const SPEC_POLL_INTERVAL_MS: u64 = 5;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

pub const ENGINE_EXE: &str = "ace_engine.exe";
pub const ASSET_BASE: &str = "https://assets.test/links";
pub const PATCH_TARGET: &str = "lib/acestreamengine.CoreApp.pyd";

pub type SpecSupervisor = Supervisor<
    FakePathResolver,
    FakeProcessAdapter,
    FakeHealthProbe,
    FakeTransfer,
    FakeLauncher,
    FakePortWatcher,
>;

/// A supervisor over fakes, with an installed engine in a temp directory.
pub struct Harness {
    pub supervisor: SpecSupervisor,
    pub resolver: FakePathResolver,
    pub processes: FakeProcessAdapter,
    pub probe: FakeHealthProbe,
    pub transfer: FakeTransfer,
    pub launcher: FakeLauncher,
    pub watcher: FakePortWatcher,
    engine_dir: tempfile::TempDir,
    log: Arc<Mutex<Vec<Notification>>>,
}

pub fn spec_config() -> SupervisorConfig {
    SupervisorConfig {
        assets: AssetConfig {
            base_url: ASSET_BASE.to_string(),
            ..AssetConfig::default()
        },
        timing: Timing::immediate(),
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with(ConnectorOptions::default(), spec_config())
    }

    pub fn with_options(options: ConnectorOptions) -> Self {
        Self::with(options, spec_config())
    }

    pub fn with(options: ConnectorOptions, config: SupervisorConfig) -> Self {
        let engine_dir = tempfile::tempdir().unwrap();
        let exe = engine_dir.path().join(ENGINE_EXE);
        std::fs::write(&exe, b"engine").unwrap();

        let resolver = FakePathResolver::with_path(exe);
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
        supervisor.subscribe(move |n: &Notification| sink.lock().unwrap().push(n.clone()));

        Self {
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

    pub fn engine_dir(&self) -> &Path {
        self.engine_dir.path()
    }

    pub fn exe(&self) -> PathBuf {
        self.engine_dir().join(ENGINE_EXE)
    }

    pub fn port_file(&self) -> PathBuf {
        self.engine_dir().join("acestream.port")
    }

    pub fn write_port_file(&self) {
        std::fs::write(self.port_file(), "6878").unwrap();
    }

    /// Engine process running with its port file present
    pub fn engine_running(&self, pid: u32) {
        self.write_port_file();
        self.processes.add_process(pid, ENGINE_EXE);
    }

    pub fn engine_answers(&self, version: &str) {
        self.probe.set_version(Some(version));
    }

    pub fn write_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.engine_dir().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Serve `asset` through its link file from `url`
    pub fn serve_asset(&self, asset: &str, url: &str, contents: &[u8]) {
        self.transfer.set_text(&format!("{ASSET_BASE}/{asset}"), url);
        self.transfer.set_file(url, contents);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.notifications().iter().map(Notification::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().iter().filter(|n| **n == name).count()
    }

    pub fn statuses(&self) -> Vec<ConnectionStatus> {
        self.notifications()
            .iter()
            .filter_map(|n| match n {
                Notification::UpdateStatus(s) => Some(s.connection_status()),
                _ => None,
            })
            .collect()
    }
}

/// Poll until `condition` holds or fail after [`SPEC_WAIT_MAX_MS`].
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_millis(SPEC_WAIT_MAX_MS) {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS)).await;
    }
    panic!("condition not met within {SPEC_WAIT_MAX_MS}ms");
}
