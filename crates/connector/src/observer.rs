// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications emitted by the supervisor and their subscribers.

use ace_core::{DownloadProgress, EngineStatus, InstallStep};
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Something the supervisor reports to its subscribers
#[derive(Debug, Clone)]
pub enum Notification {
    UpdateStatus(EngineStatus),
    PatchAvailable,
    AutoPatchCompleted,
    BeforeInstall,
    DownloadInstallerProgress(DownloadProgress),
    InstallerDownloaded(InstallerDownloaded),
    InstallComplete,
    InstallError(InstallStep),
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::UpdateStatus(_) => "updateStatus",
            Notification::PatchAvailable => "patchAvailable",
            Notification::AutoPatchCompleted => "autoPatchCompleted",
            Notification::BeforeInstall => "beforeInstall",
            Notification::DownloadInstallerProgress(_) => "downloadInstallerProgress",
            Notification::InstallerDownloaded(_) => "installerDownloaded",
            Notification::InstallComplete => "installComplete",
            Notification::InstallError(_) => "installError",
        }
    }
}

/// Payload of [`Notification::InstallerDownloaded`].
///
/// A subscriber that calls [`handle_launch_manually`](Self::handle_launch_manually)
/// while the notification is being dispatched takes over the launch; the
/// supervisor then waits for the returned [`DeferredLaunch`] instead of
/// running the installer itself.
#[derive(Clone)]
pub struct InstallerDownloaded {
    path: PathBuf,
    slot: Arc<Mutex<Option<DeferredLaunch>>>,
}

/// Outcome of an `InstallerDownloaded` dispatch
pub(crate) enum LaunchDecision {
    Automatic(DeferredLaunch),
    Deferred,
}

impl InstallerDownloaded {
    pub(crate) fn new(launch: DeferredLaunch) -> Self {
        Self {
            path: launch.path.clone(),
            slot: Arc::new(Mutex::new(Some(launch))),
        }
    }

    pub fn installer_path(&self) -> &Path {
        &self.path
    }

    /// Take the launch. Only the first call gets the handle.
    pub fn handle_launch_manually(&self) -> Option<DeferredLaunch> {
        self.slot.lock().take()
    }

    pub(crate) fn decide(&self) -> LaunchDecision {
        match self.slot.lock().take() {
            Some(launch) => LaunchDecision::Automatic(launch),
            None => LaunchDecision::Deferred,
        }
    }
}

impl fmt::Debug for InstallerDownloaded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallerDownloaded")
            .field("path", &self.path)
            .field("pending", &self.slot.lock().is_some())
            .finish()
    }
}

type LaunchFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A pending installer run.
///
/// Dropping it without calling [`launch`](Self::launch) cancels the install.
pub struct DeferredLaunch {
    path: PathBuf,
    run: LaunchFuture,
}

impl DeferredLaunch {
    pub(crate) fn new(path: PathBuf, run: impl Future<Output = ()> + Send + 'static) -> Self {
        Self {
            path,
            run: Box::pin(run),
        }
    }

    pub fn installer_path(&self) -> &Path {
        &self.path
    }

    /// Run the installer and wait for it to exit
    pub async fn launch(self) {
        self.run.await
    }
}

impl fmt::Debug for DeferredLaunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredLaunch")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Receives notifications synchronously, in emission order
pub trait Observer: Send + Sync {
    fn notify(&self, notification: &Notification);

    /// Closed observers are dropped on the next dispatch
    fn is_closed(&self) -> bool {
        false
    }
}

impl<F> Observer for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

struct ChannelObserver {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Observer for ChannelObserver {
    fn notify(&self, notification: &Notification) {
        let _ = self.tx.send(notification.clone());
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Subscriber list with ordered dispatch
#[derive(Default)]
pub(crate) struct ObserverHub {
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn Observer>)>>,
    next_id: AtomicU64,
    order: ReentrantMutex<()>,
}

impl ObserverHub {
    pub(crate) fn subscribe(&self, observer: Arc<dyn Observer>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.lock().push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub(crate) fn channel(&self) -> mpsc::UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(Arc::new(ChannelObserver { tx }));
        rx
    }

    pub(crate) fn emit(&self, notification: Notification) {
        self.emit_with(|| notification);
    }

    /// Build and dispatch a notification while holding the ordering lock.
    ///
    /// State changes made inside `build` are announced in the order they
    /// happen, even when several tasks emit concurrently.
    pub(crate) fn emit_with<F>(&self, build: F)
    where
        F: FnOnce() -> Notification,
    {
        let _order = self.order.lock();
        let notification = build();
        tracing::trace!(notification = notification.name(), "emit");

        let observers: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock();
            observers.retain(|(_, o)| !o.is_closed());
            observers.iter().map(|(_, o)| Arc::clone(o)).collect()
        };
        for observer in observers {
            observer.notify(&notification);
        }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
