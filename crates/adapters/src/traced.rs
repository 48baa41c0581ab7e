// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::launch::{LaunchAdapter, LaunchError};
use crate::process::{ProcessAdapter, ProcessError, ProcessInfo};
use async_trait::async_trait;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessAdapter
#[derive(Clone)]
pub struct TracedProcesses<P> {
    inner: P,
}

impl<P> TracedProcesses<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProcessAdapter> ProcessAdapter for TracedProcesses<P> {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProcessInfo>, ProcessError> {
        let result = self.inner.find_by_name(name).await;
        tracing::debug_span!("process.find", name).in_scope(|| match &result {
            Ok(Some(info)) => tracing::debug!(pid = info.pid, "found"),
            Ok(None) => tracing::debug!("not running"),
            Err(e) => tracing::error!(error = %e, "lookup failed"),
        });
        result
    }

    async fn kill(&self, pid: u32) -> Result<(), ProcessError> {
        let result = self.inner.kill(pid).await;
        tracing::info_span!("process.kill", pid).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed"),
        });
        result
    }
}

/// Wrapper that adds tracing to any LaunchAdapter
#[derive(Clone)]
pub struct TracedLauncher<L> {
    inner: L,
}

impl<L> TracedLauncher<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: LaunchAdapter> LaunchAdapter for TracedLauncher<L> {
    async fn spawn_engine(&self, path: &Path) -> Result<Option<u32>, LaunchError> {
        async {
            tracing::info!("starting");
            let result = self.inner.spawn_engine(path).await;
            match &result {
                Ok(pid) => tracing::info!(pid = ?pid, "engine spawned"),
                Err(e) => tracing::error!(error = %e, "spawn failed"),
            }
            result
        }
        .instrument(tracing::info_span!("launch.engine", path = %path.display()))
        .await
    }

    async fn run_installer(&self, path: &Path) -> Result<(), LaunchError> {
        async {
            tracing::info!("starting");
            let start = std::time::Instant::now();
            let result = self.inner.run_installer(path).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "installer finished"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "installer failed"),
            }
            result
        }
        .instrument(tracing::info_span!("launch.installer", path = %path.display()))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
