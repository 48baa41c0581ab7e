// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process launching for the engine and its installer

mod command;

pub use command::CommandLauncher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncher, LaunchCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from launching processes
#[derive(Debug, Clone, Error)]
pub enum LaunchError {
    #[error("failed to spawn {}: {reason}", path.display())]
    Spawn { path: PathBuf, reason: String },
    #[error("{} exited with {status}", path.display())]
    ExitStatus { path: PathBuf, status: String },
}

/// Adapter for starting external executables
#[async_trait]
pub trait LaunchAdapter: Clone + Send + Sync + 'static {
    /// Start the engine detached with no arguments. Returns its pid when known.
    async fn spawn_engine(&self, path: &Path) -> Result<Option<u32>, LaunchError>;

    /// Run an installer with inherited stdio and wait for it to exit successfully.
    async fn run_installer(&self, path: &Path) -> Result<(), LaunchError>;
}
