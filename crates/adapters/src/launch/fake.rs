// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake launcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LaunchAdapter, LaunchError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded launch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchCall {
    SpawnEngine { path: PathBuf },
    RunInstaller { path: PathBuf },
}

#[derive(Default)]
struct FakeLauncherState {
    calls: Vec<LaunchCall>,
    fail_engine: bool,
    fail_installer: bool,
    next_pid: u32,
}

/// Fake launcher that records calls without starting anything
#[derive(Clone)]
pub struct FakeLauncher {
    inner: Arc<Mutex<FakeLauncherState>>,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLauncherState {
                next_pid: 4000,
                ..Default::default()
            })),
        }
    }
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make engine spawns fail
    pub fn set_engine_fails(&self, fail: bool) {
        self.inner.lock().fail_engine = fail;
    }

    /// Make installer runs fail
    pub fn set_installer_fails(&self, fail: bool) {
        self.inner.lock().fail_installer = fail;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LaunchCall> {
        self.inner.lock().calls.clone()
    }

    pub fn engine_spawns(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, LaunchCall::SpawnEngine { .. }))
            .count()
    }

    pub fn installer_runs(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, LaunchCall::RunInstaller { .. }))
            .count()
    }
}

#[async_trait]
impl LaunchAdapter for FakeLauncher {
    async fn spawn_engine(&self, path: &Path) -> Result<Option<u32>, LaunchError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LaunchCall::SpawnEngine {
            path: path.to_path_buf(),
        });
        if inner.fail_engine {
            return Err(LaunchError::Spawn {
                path: path.to_path_buf(),
                reason: "injected failure".to_string(),
            });
        }
        inner.next_pid += 1;
        Ok(Some(inner.next_pid))
    }

    async fn run_installer(&self, path: &Path) -> Result<(), LaunchError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LaunchCall::RunInstaller {
            path: path.to_path_buf(),
        });
        if inner.fail_installer {
            return Err(LaunchError::ExitStatus {
                path: path.to_path_buf(),
                status: "exit code: 1".to_string(),
            });
        }
        Ok(())
    }
}
