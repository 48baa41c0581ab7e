// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{process_name_matches, ProcessAdapter, ProcessError, ProcessInfo};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded process call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCall {
    FindByName { name: String },
    Kill { pid: u32 },
}

#[derive(Default)]
struct FakeProcessState {
    processes: Vec<ProcessInfo>,
    calls: Vec<ProcessCall>,
    list_error: Option<String>,
}

/// Fake process table for testing
#[derive(Clone, Default)]
pub struct FakeProcessAdapter {
    inner: Arc<Mutex<FakeProcessState>>,
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a running process
    pub fn add_process(&self, pid: u32, name: &str) {
        self.inner.lock().processes.push(ProcessInfo {
            pid,
            name: name.to_string(),
        });
    }

    pub fn is_running(&self, pid: u32) -> bool {
        self.inner.lock().processes.iter().any(|p| p.pid == pid)
    }

    /// Make subsequent listings fail
    pub fn set_list_error(&self, error: Option<&str>) {
        self.inner.lock().list_error = error.map(str::to_string);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.inner.lock().calls.clone()
    }

    /// PIDs passed to `kill`, in order
    pub fn kills(&self) -> Vec<u32> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ProcessCall::Kill { pid } => Some(*pid),
                ProcessCall::FindByName { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProcessInfo>, ProcessError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProcessCall::FindByName {
            name: name.to_string(),
        });
        if let Some(error) = &inner.list_error {
            return Err(ProcessError::ListFailed(error.clone()));
        }
        Ok(inner
            .processes
            .iter()
            .find(|p| process_name_matches(&p.name, name))
            .cloned())
    }

    async fn kill(&self, pid: u32) -> Result<(), ProcessError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProcessCall::Kill { pid });
        inner.processes.retain(|p| p.pid != pid);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
