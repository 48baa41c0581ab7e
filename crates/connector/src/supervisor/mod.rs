// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine lifecycle supervisor.
//!
//! Owns the connection status, the resolved executable and the port file
//! watcher. Every status change goes through [`Supervisor::update_status`],
//! which records it and notifies subscribers in order.

mod connect;
mod install;
mod patch;
mod watch;

pub use connect::INSTALLER_FILE_NAME;

use crate::config::SupervisorConfig;
use crate::error::{ConnectError, SupervisorError};
use crate::observer::{Notification, Observer, ObserverHub, SubscriptionId};
use ace_adapters::{
    CommandLauncher, HealthProbe, HttpHealthProbe, HttpTransfer, LaunchAdapter, NotifyPortWatcher,
    PathResolver, PortWatchAdapter, ProcessAdapter, RegistryPathResolver, SystemProcessAdapter,
    TracedLauncher, TracedProcesses, TransferAdapter,
};
use ace_core::{
    ConnectorOptions, EngineExecutable, EngineStatus, HostPlatform, StableStatus, StatusTracker,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use watch::{ActiveWatcher, PendingReconnect};

/// Adapter dependencies
pub struct SupervisorDeps<R, P, H, T, L, W> {
    pub resolver: R,
    pub processes: P,
    pub probe: H,
    pub transfer: T,
    pub launcher: L,
    pub watcher: W,
    pub platform: HostPlatform,
}

/// Supervisor wired to the real registry, process table, HTTP and filesystem
pub type HostSupervisor = Supervisor<
    RegistryPathResolver,
    TracedProcesses<SystemProcessAdapter>,
    HttpHealthProbe,
    HttpTransfer,
    TracedLauncher<CommandLauncher>,
    NotifyPortWatcher,
>;

struct SupervisorState<G> {
    status: StatusTracker,
    executable: Option<EngineExecutable>,
    watcher: Option<ActiveWatcher<G>>,
    /// Bumped whenever a watcher is installed or closed
    generation: u64,
    reconnect: Option<PendingReconnect>,
}

impl<G> Default for SupervisorState<G> {
    fn default() -> Self {
        Self {
            status: StatusTracker::new(),
            executable: None,
            watcher: None,
            generation: 0,
            reconnect: None,
        }
    }
}

impl<G> Drop for SupervisorState<G> {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.close();
        }
        if let Some(reconnect) = self.reconnect.take() {
            reconnect.cancel();
        }
    }
}

struct Inner<R, P, H, T, L, W: PortWatchAdapter> {
    options: ConnectorOptions,
    config: SupervisorConfig,
    resolver: R,
    processes: P,
    probe: H,
    transfer: T,
    launcher: L,
    watcher: W,
    state: Mutex<SupervisorState<W::Guard>>,
    hub: ObserverHub,
    /// Serializes `connect()` calls
    connect_gate: tokio::sync::Mutex<()>,
}

/// Supervises a locally installed engine.
///
/// Cheap to clone; clones share state.
pub struct Supervisor<R, P, H, T, L, W: PortWatchAdapter> {
    inner: Arc<Inner<R, P, H, T, L, W>>,
}

impl<R, P, H, T, L, W: PortWatchAdapter> Clone for Supervisor<R, P, H, T, L, W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, P, H, T, L, W> Supervisor<R, P, H, T, L, W>
where
    R: PathResolver,
    P: ProcessAdapter,
    H: HealthProbe,
    T: TransferAdapter,
    L: LaunchAdapter,
    W: PortWatchAdapter,
{
    /// Create a supervisor. Fails on platforms the engine does not run on.
    pub fn new(
        options: ConnectorOptions,
        deps: SupervisorDeps<R, P, H, T, L, W>,
        config: SupervisorConfig,
    ) -> Result<Self, SupervisorError> {
        if !deps.platform.is_supported() {
            return Err(SupervisorError::UnsupportedPlatform(deps.platform));
        }
        Ok(Self {
            inner: Arc::new(Inner {
                options,
                config,
                resolver: deps.resolver,
                processes: deps.processes,
                probe: deps.probe,
                transfer: deps.transfer,
                launcher: deps.launcher,
                watcher: deps.watcher,
                state: Mutex::new(SupervisorState::default()),
                hub: ObserverHub::default(),
                connect_gate: tokio::sync::Mutex::new(()),
            }),
        })
    }

    fn from_weak(inner: &Weak<Inner<R, P, H, T, L, W>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    fn downgrade(&self) -> Weak<Inner<R, P, H, T, L, W>> {
        Arc::downgrade(&self.inner)
    }

    pub fn options(&self) -> &ConnectorOptions {
        &self.inner.options
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.inner.config
    }

    /// Current status
    pub fn status(&self) -> EngineStatus {
        self.inner.state.lock().status.current().clone()
    }

    /// Last connected/disconnected status; `None` until one has been set
    pub fn last_connected_status(&self) -> Option<StableStatus> {
        self.inner.state.lock().status.last_stable()
    }

    /// Executable recorded by the last successful resolution
    pub fn engine_executable(&self) -> Option<EngineExecutable> {
        self.inner.state.lock().executable.clone()
    }

    /// Register an observer. Observers run synchronously on the emitting task.
    pub fn subscribe(&self, observer: impl Observer + 'static) -> SubscriptionId {
        self.inner.hub.subscribe(Arc::new(observer))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.hub.unsubscribe(id)
    }

    /// Stream of notifications for async consumers
    pub fn notifications(&self) -> mpsc::UnboundedReceiver<Notification> {
        self.inner.hub.channel()
    }

    pub(crate) fn emit(&self, notification: Notification) {
        self.inner.hub.emit(notification);
    }

    /// The only path that changes the status.
    pub(crate) fn update_status(&self, status: EngineStatus) {
        self.inner.hub.emit_with(|| {
            let mut state = self.inner.state.lock();
            let announced = state.status.apply(status.clone());
            tracing::debug!(status = %announced, "status updated");
            Notification::UpdateStatus(status)
        });
    }

    /// Probe the engine's HTTP API and record the outcome.
    ///
    /// Never fails: an unreachable engine is reported as `Disconnected`.
    pub async fn check_http_connection(&self) -> bool {
        match self.inner.probe.get_version(self.inner.options.http_port).await {
            Ok(version) => {
                tracing::info!(version, "engine reachable");
                self.update_status(EngineStatus::connected(version));
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "engine unreachable");
                self.update_status(EngineStatus::Disconnected);
                false
            }
        }
    }

    /// Stop a running engine.
    ///
    /// Returns `false` and leaves the status alone when no engine process is
    /// running.
    pub async fn disconnect(&self) -> Result<bool, ConnectError> {
        let executable = match self.engine_executable() {
            Some(executable) => executable,
            None => match self.resolve_executable().await {
                Ok(executable) => executable,
                Err(ConnectError::EngineNotInstalled(reason)) => {
                    tracing::debug!(%reason, "nothing to disconnect");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            },
        };

        let Some(name) = executable.file_name() else {
            return Ok(false);
        };
        let Some(process) = self.inner.processes.find_by_name(name).await? else {
            tracing::debug!(name, "engine is not running");
            return Ok(false);
        };

        self.inner.processes.kill(process.pid).await?;
        self.close_watcher();
        self.update_status(EngineStatus::Disconnected);
        tracing::info!(pid = process.pid, "engine disconnected");
        Ok(true)
    }
}

impl HostSupervisor {
    /// Supervisor using the host's registry, process table, network and filesystem
    pub fn host(
        options: ConnectorOptions,
        config: SupervisorConfig,
    ) -> Result<Self, SupervisorError> {
        let probe =
            HttpHealthProbe::new().map_err(|e| SupervisorError::HttpClient(e.to_string()))?;
        let transfer =
            HttpTransfer::new().map_err(|e| SupervisorError::HttpClient(e.to_string()))?;
        Self::new(
            options,
            SupervisorDeps {
                resolver: RegistryPathResolver::default(),
                processes: TracedProcesses::new(SystemProcessAdapter::new()),
                probe,
                transfer,
                launcher: TracedLauncher::new(CommandLauncher::new()),
                watcher: NotifyPortWatcher::new(),
                platform: HostPlatform::current(),
            },
            config,
        )
    }
}

#[cfg(test)]
#[path = "../supervisor_tests/mod.rs"]
mod tests;
