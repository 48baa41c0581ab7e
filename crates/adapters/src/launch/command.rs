// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher backed by `tokio::process::Command`.

use super::{LaunchAdapter, LaunchError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Clone, Debug, Default)]
pub struct CommandLauncher;

impl CommandLauncher {
    pub fn new() -> Self {
        Self
    }
}

fn spawn_error(path: &Path, e: std::io::Error) -> LaunchError {
    LaunchError::Spawn {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl LaunchAdapter for CommandLauncher {
    async fn spawn_engine(&self, path: &Path) -> Result<Option<u32>, LaunchError> {
        let mut cmd = Command::new(path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = path.parent() {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| spawn_error(path, e))?;
        let pid = child.id();

        // Reap the engine when it exits; it outlives this call otherwise.
        let engine_path = path.display().to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    tracing::debug!(path = %engine_path, %status, "engine process exited")
                }
                Err(e) => {
                    tracing::warn!(path = %engine_path, error = %e, "failed to wait on engine")
                }
            }
        });

        Ok(pid)
    }

    async fn run_installer(&self, path: &Path) -> Result<(), LaunchError> {
        let status = Command::new(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| spawn_error(path, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::ExitStatus {
                path: path.to_path_buf(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(all(test, unix))]
#[path = "command_tests.rs"]
mod tests;
