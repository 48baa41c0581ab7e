// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine installation.

use super::Supervisor;
use crate::error::InstallError;
use crate::observer::{DeferredLaunch, InstallerDownloaded, LaunchDecision, Notification};
use ace_adapters::{
    HealthProbe, LaunchAdapter, PathResolver, PortWatchAdapter, ProcessAdapter, TransferAdapter,
    TransferError,
};
use ace_core::{InstallStep, RemoteAsset};
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;

impl<R, P, H, T, L, W> Supervisor<R, P, H, T, L, W>
where
    R: PathResolver,
    P: ProcessAdapter,
    H: HealthProbe,
    T: TransferAdapter,
    L: LaunchAdapter,
    W: PortWatchAdapter,
{
    /// Download the installer to `save_path` unless a file is already there.
    pub async fn download_installer(&self, save_path: &Path) -> Result<(), InstallError> {
        if tokio::fs::try_exists(save_path).await.unwrap_or(false) {
            tracing::debug!(path = %save_path.display(), "installer already present");
            return Ok(());
        }

        match self.fetch_installer(save_path).await {
            Ok(bytes) => {
                tracing::info!(path = %save_path.display(), bytes, "installer downloaded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "installer download failed");
                let _ = tokio::fs::remove_file(save_path).await;
                self.emit(Notification::InstallError(InstallStep::Download));
                Err(InstallError::Download(e))
            }
        }
    }

    async fn fetch_installer(&self, save_path: &Path) -> Result<u64, TransferError> {
        let link = self.inner.config.assets.link_url(RemoteAsset::Installer);
        let url = self.inner.transfer.fetch_text(&link).await?;
        let hub = &self.inner.hub;
        self.inner
            .transfer
            .download(&url, save_path, &|progress| {
                hub.emit(Notification::DownloadInstallerProgress(progress))
            })
            .await
    }

    /// Download (if needed) and run the installer.
    ///
    /// Subscribers may take over the launch from the `InstallerDownloaded`
    /// notification; this call then completes when their deferred launch
    /// finishes, or fails with [`InstallError::Cancelled`] if it is dropped.
    pub async fn install(&self, save_path: &Path) -> Result<(), InstallError> {
        self.emit(Notification::BeforeInstall);
        self.download_installer(save_path).await?;

        let (done_tx, done_rx) = oneshot::channel();
        let launch = self.deferred_launch(save_path.to_path_buf(), done_tx);
        let payload = InstallerDownloaded::new(launch);
        self.emit(Notification::InstallerDownloaded(payload.clone()));

        match payload.decide() {
            LaunchDecision::Automatic(launch) => launch.launch().await,
            LaunchDecision::Deferred => tracing::info!("installer launch deferred"),
        }

        done_rx.await.unwrap_or(Err(InstallError::Cancelled))
    }

    fn deferred_launch(
        &self,
        installer: PathBuf,
        done: oneshot::Sender<Result<(), InstallError>>,
    ) -> DeferredLaunch {
        let supervisor = self.clone();
        let path = installer.clone();
        DeferredLaunch::new(installer, async move {
            let result = supervisor.run_installer(&path).await;
            let _ = done.send(result);
        })
    }

    async fn run_installer(&self, installer: &Path) -> Result<(), InstallError> {
        match self.inner.launcher.run_installer(installer).await {
            Ok(()) => {
                self.emit(Notification::InstallComplete);
                Ok(())
            }
            Err(e) => {
                self.emit(Notification::InstallError(InstallStep::Execute));
                Err(InstallError::Execute(e))
            }
        }
    }
}
