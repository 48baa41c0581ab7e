// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine supervisor

use ace_adapters::{LaunchError, ProcessError, TransferError, WatchError};
use ace_core::{HostPlatform, InstallStep};
use thiserror::Error;

/// Failure categories a caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionErrorKind {
    EngineNotInstalled,
    EngineReadPortError,
    EngineRunFail,
    EngineNotStarted,
    Install(InstallStep),
}

/// Errors from [`Supervisor::connect`](crate::Supervisor::connect)
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("engine is not installed: {0}")]
    EngineNotInstalled(String),
    #[error("failed to read engine port file: {0}")]
    EngineReadPortError(#[source] std::io::Error),
    #[error("failed to start engine: {0}")]
    EngineRunFail(#[from] LaunchError),
    #[error("engine is not running and auto start is disabled")]
    EngineNotStarted,
    #[error(transparent)]
    Install(#[from] InstallError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("process lookup failed: {0}")]
    Process(#[from] ProcessError),
    #[error("failed to watch engine directory: {0}")]
    Watch(#[from] WatchError),
}

impl ConnectError {
    /// Category of this error; `None` for failures outside the taxonomy.
    pub fn kind(&self) -> Option<ConnectionErrorKind> {
        match self {
            ConnectError::EngineNotInstalled(_) => Some(ConnectionErrorKind::EngineNotInstalled),
            ConnectError::EngineReadPortError(_) => Some(ConnectionErrorKind::EngineReadPortError),
            ConnectError::EngineRunFail(_) => Some(ConnectionErrorKind::EngineRunFail),
            ConnectError::EngineNotStarted => Some(ConnectionErrorKind::EngineNotStarted),
            ConnectError::Install(e) => e.step().map(ConnectionErrorKind::Install),
            ConnectError::Patch(_) | ConnectError::Process(_) | ConnectError::Watch(_) => None,
        }
    }
}

/// Errors from installing the engine
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to download installer: {0}")]
    Download(#[source] TransferError),
    #[error("failed to run installer: {0}")]
    Execute(#[source] LaunchError),
    #[error("deferred installer launch was dropped")]
    Cancelled,
}

impl InstallError {
    pub fn step(&self) -> Option<InstallStep> {
        match self {
            InstallError::Download(_) => Some(InstallStep::Download),
            InstallError::Execute(_) => Some(InstallStep::Execute),
            InstallError::Cancelled => None,
        }
    }
}

/// Errors from replacing a patched engine file
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to checksum {path}: {source}")]
    Checksum {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to download patch: {0}")]
    Download(#[from] TransferError),
    #[error("failed to replace {path}: {source}")]
    Replace {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to stop engine before patching: {0}")]
    StopEngine(#[from] ProcessError),
}

/// Errors from constructing a supervisor
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("unsupported platform: {0} (only Windows is supported)")]
    UnsupportedPlatform(HostPlatform),
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
