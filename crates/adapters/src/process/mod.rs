// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS process inspection adapters

mod system;

pub use system::SystemProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessAdapter, ProcessCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from process operations
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    #[error("process listing failed: {0}")]
    ListFailed(String),
    #[error("failed to kill process {pid}: {reason}")]
    KillFailed { pid: u32, reason: String },
}

/// A running OS process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// Adapter for finding and terminating OS processes
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Find a running process whose executable file name is `name`
    async fn find_by_name(&self, name: &str) -> Result<Option<ProcessInfo>, ProcessError>;

    /// Terminate a process. A process that is already gone is not an error.
    async fn kill(&self, pid: u32) -> Result<(), ProcessError>;
}

/// Executable names compare case-insensitively on the engine's platform.
pub fn process_name_matches(candidate: &str, name: &str) -> bool {
    candidate.eq_ignore_ascii_case(name)
}
