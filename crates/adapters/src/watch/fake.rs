// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake port watcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PortFileEvent, PortWatchAdapter, WatchError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Default)]
struct FakeWatchState {
    next_id: u64,
    open: HashMap<u64, mpsc::Sender<PortFileEvent>>,
    watched: Vec<(PathBuf, String)>,
    fail: bool,
}

/// Fake watcher; tests push events with [`FakePortWatcher::emit`]
#[derive(Clone, Default)]
pub struct FakePortWatcher {
    inner: Arc<Mutex<FakeWatchState>>,
}

/// Closes the fake watch when dropped
pub struct FakeWatchGuard {
    id: u64,
    inner: Arc<Mutex<FakeWatchState>>,
}

impl Drop for FakeWatchGuard {
    fn drop(&mut self) {
        self.inner.lock().open.remove(&self.id);
    }
}

impl FakePortWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `watch` calls fail
    pub fn set_fails(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }

    /// Deliver an event to every open watch
    pub async fn emit(&self, event: PortFileEvent) {
        let senders: Vec<_> = self.inner.lock().open.values().cloned().collect();
        for tx in senders {
            let _ = tx.send(event).await;
        }
    }

    /// Number of watches whose guard is still alive
    pub fn open_handles(&self) -> usize {
        self.inner.lock().open.len()
    }

    /// Every (dir, file name) pair passed to `watch`
    pub fn watch_calls(&self) -> Vec<(PathBuf, String)> {
        self.inner.lock().watched.clone()
    }
}

impl PortWatchAdapter for FakePortWatcher {
    type Guard = FakeWatchGuard;

    fn watch(
        &self,
        dir: &Path,
        file_name: &str,
        tx: mpsc::Sender<PortFileEvent>,
    ) -> Result<FakeWatchGuard, WatchError> {
        let mut inner = self.inner.lock();
        inner
            .watched
            .push((dir.to_path_buf(), file_name.to_string()));
        if inner.fail {
            return Err(WatchError {
                dir: dir.display().to_string(),
                reason: "injected failure".to_string(),
            });
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.open.insert(id, tx);
        Ok(FakeWatchGuard {
            id,
            inner: Arc::clone(&self.inner),
        })
    }
}
