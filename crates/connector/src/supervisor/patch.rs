// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine file patching.

use super::Supervisor;
use crate::error::PatchError;
use crate::observer::Notification;
use ace_adapters::{
    md5_file, HealthProbe, LaunchAdapter, PathResolver, PortWatchAdapter, ProcessAdapter,
    TransferAdapter,
};
use ace_core::{EngineExecutable, PatchDescriptor};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Sibling file the replacement is downloaded to before it is moved into place
pub(crate) fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(OsString::from).unwrap_or_default();
    name.push(".download");
    target.with_file_name(name)
}

/// Replace `target` with `staging`. The staging file is removed if the
/// replacement fails.
pub(crate) async fn move_into_place(staging: &Path, target: &Path) -> std::io::Result<()> {
    let result = match tokio::fs::remove_file(target).await {
        Ok(()) => tokio::fs::rename(staging, target).await,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tokio::fs::rename(staging, target).await
        }
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(staging).await;
    }
    result
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
    /// Patch the resolved engine if any known file differs from its expected
    /// checksum. Returns whether anything was patched.
    ///
    /// A running engine is stopped first and is not restarted here; the next
    /// `connect()` (or the port file watcher's reconnect) starts it again.
    pub async fn patch_engine(&self) -> Result<bool, PatchError> {
        let Some(executable) = self.engine_executable() else {
            return Ok(false);
        };
        let pending = self.pending_patches(&executable.dir).await?;
        if pending.is_empty() {
            return Ok(false);
        }
        self.stop_engine_for_patch(&executable).await?;
        self.apply_patches(&executable.dir, &pending).await?;
        Ok(true)
    }

    /// Connection step: announce and apply pending patches before the engine starts
    pub(super) async fn check_patches(
        &self,
        executable: &EngineExecutable,
    ) -> Result<(), PatchError> {
        let pending = self.pending_patches(&executable.dir).await?;
        if pending.is_empty() {
            return Ok(());
        }
        tracing::info!(count = pending.len(), "engine patch available");
        self.emit(Notification::PatchAvailable);
        self.stop_engine_for_patch(executable).await?;
        self.apply_patches(&executable.dir, &pending).await
    }

    /// A running engine keeps its modules open; stop it so they can be replaced.
    async fn stop_engine_for_patch(
        &self,
        executable: &EngineExecutable,
    ) -> Result<(), PatchError> {
        let Some(name) = executable.file_name() else {
            return Ok(());
        };
        if let Some(process) = self.inner.processes.find_by_name(name).await? {
            tracing::info!(pid = process.pid, "stopping engine before patching");
            self.inner.processes.kill(process.pid).await?;
        }
        Ok(())
    }

    /// Descriptors whose target exists with the wrong checksum. Missing
    /// targets are never patched.
    async fn pending_patches(
        &self,
        engine_dir: &Path,
    ) -> Result<Vec<PatchDescriptor>, PatchError> {
        let mut pending = Vec::new();
        for patch in &self.inner.config.assets.patches {
            let target = patch.target_in(engine_dir);
            if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
                continue;
            }
            let checksum = md5_file(&target)
                .await
                .map_err(|source| PatchError::Checksum {
                    path: target.display().to_string(),
                    source,
                })?;
            if !patch.matches(&checksum) {
                tracing::debug!(
                    path = %target.display(),
                    %checksum,
                    expected = %patch.expected_md5,
                    "checksum mismatch"
                );
                pending.push(patch.clone());
            }
        }
        Ok(pending)
    }

    async fn apply_patches(
        &self,
        engine_dir: &Path,
        pending: &[PatchDescriptor],
    ) -> Result<(), PatchError> {
        for patch in pending {
            self.apply_patch(engine_dir, patch).await?;
        }
        self.emit(Notification::AutoPatchCompleted);
        Ok(())
    }

    /// Download the replacement beside the target, then move it into place.
    async fn apply_patch(
        &self,
        engine_dir: &Path,
        patch: &PatchDescriptor,
    ) -> Result<(), PatchError> {
        let target = patch.target_in(engine_dir);
        let link = self.inner.config.assets.link_url(patch.replacement);
        let url = self.inner.transfer.fetch_text(&link).await?;

        let staging = staging_path(&target);
        if let Err(e) = self.inner.transfer.download(&url, &staging, &|_| {}).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        move_into_place(&staging, &target)
            .await
            .map_err(|source| PatchError::Replace {
                path: target.display().to_string(),
                source,
            })?;

        match md5_file(&target).await {
            Ok(checksum) if patch.matches(&checksum) => {
                tracing::info!(path = %target.display(), "patch applied");
            }
            Ok(checksum) => tracing::warn!(
                path = %target.display(),
                %checksum,
                expected = %patch.expected_md5,
                "patched file has unexpected checksum"
            ),
            Err(e) => tracing::warn!(path = %target.display(), error = %e, "cannot verify patch"),
        }
        Ok(())
    }
}
