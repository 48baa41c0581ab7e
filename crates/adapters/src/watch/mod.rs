// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port file watching

mod notify_watcher;

pub use notify_watcher::NotifyPortWatcher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePortWatcher, FakeWatchGuard};

use notify::EventKind;
use std::path::Path;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from installing a watcher
#[derive(Debug, Error)]
#[error("failed to watch {dir}: {reason}")]
pub struct WatchError {
    pub dir: String,
    pub reason: String,
}

/// What happened to the engine's port file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortFileEvent {
    /// Created or rewritten
    Changed,
    /// Gone from disk
    Removed,
}

/// Map a raw filesystem event onto a port file event.
///
/// `exists` is whether the file is on disk after the event. Pure access
/// events are ignored.
pub fn classify(kind: &EventKind, exists: bool) -> Option<PortFileEvent> {
    match kind {
        EventKind::Access(_) => None,
        EventKind::Remove(_) => Some(PortFileEvent::Removed),
        _ if !exists => Some(PortFileEvent::Removed),
        _ => Some(PortFileEvent::Changed),
    }
}

/// Adapter for observing a single file within a directory.
///
/// Events are delivered on `tx` until the returned guard is dropped.
pub trait PortWatchAdapter: Clone + Send + Sync + 'static {
    type Guard: Send + 'static;

    fn watch(
        &self,
        dir: &Path,
        file_name: &str,
        tx: mpsc::Sender<PortFileEvent>,
    ) -> Result<Self::Guard, WatchError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
