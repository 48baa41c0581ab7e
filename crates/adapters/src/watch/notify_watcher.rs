// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{classify, PortFileEvent, PortWatchAdapter, WatchError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc;

/// Watches the engine directory with the platform's native backend.
#[derive(Clone, Debug, Default)]
pub struct NotifyPortWatcher;

impl NotifyPortWatcher {
    pub fn new() -> Self {
        Self
    }
}

impl PortWatchAdapter for NotifyPortWatcher {
    type Guard = RecommendedWatcher;

    fn watch(
        &self,
        dir: &Path,
        file_name: &str,
        tx: mpsc::Sender<PortFileEvent>,
    ) -> Result<RecommendedWatcher, WatchError> {
        let target = dir.join(file_name);
        let watch_error = |e: notify::Error| WatchError {
            dir: dir.display().to_string(),
            reason: e.to_string(),
        };

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "port file watcher error");
                    return;
                }
            };
            if !event.paths.iter().any(|p| p == &target) {
                return;
            }
            if let Some(change) = classify(&event.kind, target.exists()) {
                let _ = tx.blocking_send(change);
            }
        })
        .map_err(watch_error)?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;
        Ok(watcher)
    }
}

#[cfg(test)]
#[path = "notify_watcher_tests.rs"]
mod tests;
