// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port file watching and the reconnect timer.

use super::{Inner, Supervisor};
use ace_adapters::{
    HealthProbe, LaunchAdapter, PathResolver, PortFileEvent, PortWatchAdapter, ProcessAdapter,
    TransferAdapter, WatchError,
};
use ace_core::{EngineExecutable, EngineStatus, PORT_FILE_NAME};
use std::sync::Weak;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const PORT_EVENT_BUFFER: usize = 16;

/// The open watcher and the task draining its events
pub(super) struct ActiveWatcher<G> {
    generation: u64,
    _guard: G,
    task: JoinHandle<()>,
}

impl<G> ActiveWatcher<G> {
    pub(super) fn close(self) {
        tracing::debug!(generation = self.generation, "closing port file watcher");
        self.task.abort();
    }
}

/// A reconnect scheduled after the port file disappeared
pub(super) struct PendingReconnect {
    pub(super) generation: u64,
    task: JoinHandle<()>,
}

impl PendingReconnect {
    pub(super) fn cancel(self) {
        tracing::debug!(generation = self.generation, "cancelling reconnect");
        self.task.abort();
    }
}

impl<R, P, H, T, L, W> Supervisor<R, P, H, T, L, W>
where
    R: PathResolver,
    P: ProcessAdapter,
    H: HealthProbe,
    T: TransferAdapter,
    L: LaunchAdapter,
    W: PortWatchAdapter,
{
    /// Replace the watcher with a fresh one on the engine directory.
    ///
    /// The previous watcher and any pending reconnect are closed first, so at
    /// most one watcher is open at a time.
    pub(super) fn install_watcher(&self, executable: &EngineExecutable) -> Result<(), WatchError> {
        let mut state = self.inner.state.lock();
        if let Some(previous) = state.watcher.take() {
            previous.close();
        }
        if let Some(pending) = state.reconnect.take() {
            pending.cancel();
        }
        state.generation += 1;
        let generation = state.generation;

        let (tx, rx) = mpsc::channel(PORT_EVENT_BUFFER);
        let guard = self
            .inner
            .watcher
            .watch(&executable.dir, PORT_FILE_NAME, tx)?;
        let task = tokio::spawn(watch_loop(self.downgrade(), generation, rx));
        state.watcher = Some(ActiveWatcher {
            generation,
            _guard: guard,
            task,
        });

        tracing::debug!(generation, dir = %executable.dir.display(), "watching port file");
        Ok(())
    }

    /// Close the watcher and cancel any pending reconnect
    pub(super) fn close_watcher(&self) {
        let mut state = self.inner.state.lock();
        if let Some(watcher) = state.watcher.take() {
            watcher.close();
        }
        if let Some(pending) = state.reconnect.take() {
            pending.cancel();
        }
        state.generation += 1;
    }

    async fn handle_port_event(&self, generation: u64, event: PortFileEvent) {
        match event {
            PortFileEvent::Changed => {
                tracing::debug!(generation, "port file changed");
                self.check_http_connection().await;
            }
            PortFileEvent::Removed => {
                tracing::info!(generation, "port file removed, engine stopped");
                self.update_status(EngineStatus::Disconnected);
                if self.inner.options.restart_on_suspend() {
                    self.schedule_reconnect(generation);
                }
            }
        }
    }

    /// Schedule a single delayed `connect()`, replacing any pending one.
    pub(super) fn schedule_reconnect(&self, generation: u64) {
        let mut state = self.inner.state.lock();
        if state.generation != generation {
            tracing::debug!(generation, "stale watcher, not reconnecting");
            return;
        }
        if let Some(previous) = state.reconnect.take() {
            previous.cancel();
        }

        let delay = self.inner.config.timing.reconnect_delay;
        let weak = self.downgrade();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(supervisor) = Supervisor::from_weak(&weak) else {
                return;
            };
            if !supervisor.claim_reconnect(generation) {
                return;
            }
            tracing::info!(generation, "reconnecting to engine");
            if let Err(e) = supervisor.connect().await {
                tracing::warn!(error = %e, "reconnect failed");
            }
        });
        state.reconnect = Some(PendingReconnect { generation, task });
        tracing::info!(generation, delay_ms = delay.as_millis() as u64, "reconnect scheduled");
    }

    /// Detach the pending reconnect so a new watcher does not cancel it mid-run
    fn claim_reconnect(&self, generation: u64) -> bool {
        let mut state = self.inner.state.lock();
        let current = state.generation == generation
            && state
                .reconnect
                .as_ref()
                .is_some_and(|pending| pending.generation == generation);
        if current {
            state.reconnect = None;
        }
        current
    }
}

async fn watch_loop<R, P, H, T, L, W>(
    inner: Weak<Inner<R, P, H, T, L, W>>,
    generation: u64,
    mut rx: mpsc::Receiver<PortFileEvent>,
) where
    R: PathResolver,
    P: ProcessAdapter,
    H: HealthProbe,
    T: TransferAdapter,
    L: LaunchAdapter,
    W: PortWatchAdapter,
{
    while let Some(event) = rx.recv().await {
        let Some(supervisor) = Supervisor::from_weak(&inner) else {
            break;
        };
        supervisor.handle_port_event(generation, event).await;
    }
}
