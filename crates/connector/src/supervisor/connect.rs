// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connection procedure.

use super::Supervisor;
use crate::error::ConnectError;
use ace_adapters::{
    HealthProbe, LaunchAdapter, PathResolver, PortWatchAdapter, ProcessAdapter, TransferAdapter,
};
use ace_core::{EngineExecutable, EngineStatus};
use std::path::Path;

/// File name of the installer downloaded by automatic installs
pub const INSTALLER_FILE_NAME: &str = "ace-connector--ace-stream-installer.exe";

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
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
    /// Connect to the engine, starting (and with `autoInstall`, installing) it
    /// as needed.
    ///
    /// Concurrent calls are queued. When the engine had to be started the
    /// status stays `Checking` until the port file watcher confirms it.
    pub async fn connect(&self) -> Result<(), ConnectError> {
        let _gate = self.inner.connect_gate.lock().await;
        self.update_status(EngineStatus::Checking);

        let result = match self.connection_procedure().await {
            Err(ConnectError::EngineNotInstalled(reason)) if self.inner.options.auto_install => {
                tracing::info!(%reason, "engine not installed, installing");
                let installer = std::env::temp_dir().join(INSTALLER_FILE_NAME);
                match self.install(&installer).await {
                    Ok(()) => {
                        tokio::time::sleep(self.inner.config.timing.install_settle).await;
                        self.connection_procedure().await
                    }
                    Err(e) => Err(e.into()),
                }
            }
            result => result,
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, "connect failed");
            self.update_status(EngineStatus::Disconnected);
        }
        result
    }

    async fn connection_procedure(&self) -> Result<(), ConnectError> {
        let executable = self.resolve_executable().await?;
        tracing::info!(path = %executable.path.display(), "engine executable resolved");
        self.inner.state.lock().executable = Some(executable.clone());

        if self.inner.options.watch_enabled() {
            self.install_watcher(&executable)?;
        }
        if self.inner.options.check_for_patch {
            self.check_patches(&executable).await?;
        }
        self.start_or_skip(&executable).await
    }

    /// Explicit path from the options first, then the resolver.
    pub(super) async fn resolve_executable(&self) -> Result<EngineExecutable, ConnectError> {
        let path = match &self.inner.options.ace_engine_executable_path {
            Some(path) => path.clone(),
            None => match self.inner.resolver.engine_path().await {
                Ok(Some(path)) => path,
                Ok(None) => {
                    return Err(ConnectError::EngineNotInstalled(
                        "no install path recorded".to_string(),
                    ))
                }
                Err(e) => return Err(ConnectError::EngineNotInstalled(e.to_string())),
            },
        };

        if !path_exists(&path).await {
            return Err(ConnectError::EngineNotInstalled(format!(
                "{} does not exist",
                path.display()
            )));
        }
        let executable = EngineExecutable::from_path(path);
        if executable.file_name().is_none() {
            return Err(ConnectError::EngineNotInstalled(format!(
                "{} does not name an executable",
                executable.path.display()
            )));
        }
        Ok(executable)
    }

    /// Decide whether the engine needs starting.
    ///
    /// A missing port file means the engine is not running. A present one may
    /// be stale, so the process table and HTTP API are consulted before
    /// trusting it.
    async fn start_or_skip(&self, executable: &EngineExecutable) -> Result<(), ConnectError> {
        if !path_exists(&executable.port_file()).await {
            tracing::debug!("no port file, engine is not running");
            return self.start_engine(executable).await;
        }

        let Some(name) = executable.file_name() else {
            return Err(ConnectError::EngineNotInstalled(format!(
                "{} does not name an executable",
                executable.path.display()
            )));
        };
        let Some(process) = self.inner.processes.find_by_name(name).await? else {
            tracing::info!("stale port file, starting engine");
            return self.start_engine(executable).await;
        };

        if self.check_http_connection().await {
            tracing::info!(pid = process.pid, "engine already running");
            return Ok(());
        }

        tracing::info!(pid = process.pid, "engine unresponsive, restarting");
        self.inner.processes.kill(process.pid).await?;
        self.start_engine(executable).await
    }

    async fn start_engine(&self, executable: &EngineExecutable) -> Result<(), ConnectError> {
        if !self.inner.options.start_on_connect() {
            return Err(ConnectError::EngineNotStarted);
        }
        let pid = self.inner.launcher.spawn_engine(&executable.path).await?;
        tracing::info!(pid = ?pid, "engine launched, waiting for port file");
        Ok(())
    }
}
