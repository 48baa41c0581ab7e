// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lifecycle supervisor for a locally installed engine.
//!
//! [`Supervisor`] locates the engine, keeps its files patched, starts it when
//! needed and tracks whether it is reachable. Status changes and install
//! progress are reported as [`Notification`]s.

mod config;
mod env;
mod error;
mod observer;
mod supervisor;

pub use config::{SupervisorConfig, Timing};
pub use error::{ConnectError, ConnectionErrorKind, InstallError, PatchError, SupervisorError};
pub use observer::{DeferredLaunch, InstallerDownloaded, Notification, Observer, SubscriptionId};
pub use supervisor::{HostSupervisor, Supervisor, SupervisorDeps, INSTALLER_FILE_NAME};

pub use ace_core::{
    AssetConfig, AutoStart, ConnectionStatus, ConnectorOptions, DownloadProgress, EngineExecutable,
    EngineStatus, HostPlatform, InstallStep, StableStatus, RECOMMENDED_ENGINE_VERSION,
};

#[cfg(test)]
mod test_helpers;
