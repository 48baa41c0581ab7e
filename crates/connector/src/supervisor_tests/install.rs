// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{wait_for, ASSET_BASE};
use crate::{DeferredLaunch, InstallError};
use ace_adapters::LaunchCall;
use ace_core::InstallStep;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

const INSTALLER_LINK: &str = "https://cdn.test/setup.exe";

impl TestContext {
    fn serve_installer(&self) {
        self.transfer
            .set_text(&format!("{ASSET_BASE}/installer"), INSTALLER_LINK);
        self.transfer.set_file(INSTALLER_LINK, b"MZ installer");
    }

    fn installer_path(&self) -> PathBuf {
        self.engine_dir.path().join("setup.exe")
    }

    /// Take the launch handle from the first `InstallerDownloaded` notification
    fn intercept_launch(&self) -> Arc<Mutex<Option<DeferredLaunch>>> {
        let slot = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&slot);
        self.supervisor.subscribe(move |n: &Notification| {
            if let Notification::InstallerDownloaded(payload) = n {
                if let Some(launch) = payload.handle_launch_manually() {
                    *sink.lock() = Some(launch);
                }
            }
        });
        slot
    }
}

#[tokio::test]
async fn install_downloads_then_runs_automatically() {
    let ctx = setup();
    ctx.serve_installer();
    let installer = ctx.installer_path();

    ctx.supervisor.install(&installer).await.unwrap();

    assert_eq!(std::fs::read(&installer).unwrap(), b"MZ installer");
    assert_eq!(
        ctx.launcher.calls(),
        vec![LaunchCall::RunInstaller {
            path: installer.clone()
        }]
    );
    assert_eq!(
        ctx.names(),
        vec![
            "beforeInstall",
            "downloadInstallerProgress",
            "installerDownloaded",
            "installComplete",
        ]
    );
}

#[tokio::test]
async fn progress_reports_bytes() {
    let ctx = setup();
    ctx.serve_installer();

    ctx.supervisor.download_installer(&ctx.installer_path()).await.unwrap();

    let progress: Vec<_> = ctx
        .log
        .lock()
        .iter()
        .filter_map(|n| match n {
            Notification::DownloadInstallerProgress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].transferred, 12);
    assert_eq!(progress[0].percent(), Some(100.0));
}

#[tokio::test]
async fn existing_installer_is_not_downloaded_again() {
    let ctx = setup();
    std::fs::write(ctx.installer_path(), b"cached").unwrap();

    ctx.supervisor.install(&ctx.installer_path()).await.unwrap();

    assert!(ctx.transfer.calls().is_empty());
    assert_eq!(ctx.launcher.installer_runs(), 1);
    assert_eq!(ctx.count("downloadInstallerProgress"), 0);
}

#[tokio::test]
async fn manual_launch_excludes_automatic_run() {
    let ctx = setup();
    ctx.serve_installer();
    let slot = ctx.intercept_launch();

    let supervisor = ctx.supervisor.clone();
    let installer = ctx.installer_path();
    let install = tokio::spawn(async move { supervisor.install(&installer).await });

    wait_for(|| slot.lock().is_some()).await;
    tokio::task::yield_now().await;
    assert_eq!(ctx.launcher.installer_runs(), 0);
    assert!(!install.is_finished());

    let launch = slot.lock().take().unwrap();
    assert_eq!(launch.installer_path(), ctx.installer_path());
    launch.launch().await;

    install.await.unwrap().unwrap();
    assert_eq!(ctx.launcher.installer_runs(), 1);
    assert_eq!(ctx.count("installComplete"), 1);
}

#[tokio::test]
async fn dropped_manual_handle_cancels_install() {
    let ctx = setup();
    ctx.serve_installer();
    let slot = ctx.intercept_launch();

    let supervisor = ctx.supervisor.clone();
    let installer = ctx.installer_path();
    let install = tokio::spawn(async move { supervisor.install(&installer).await });

    wait_for(|| slot.lock().is_some()).await;
    drop(slot.lock().take());

    let err = install.await.unwrap().unwrap_err();
    assert!(matches!(err, InstallError::Cancelled));
    assert_eq!(ctx.launcher.installer_runs(), 0);
}

#[tokio::test]
async fn download_failure_reports_download_step() {
    let ctx = setup();

    let err = ctx
        .supervisor
        .install(&ctx.installer_path())
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(InstallStep::Download));
    assert!(!ctx.installer_path().exists());
    assert_eq!(ctx.names(), vec!["beforeInstall", "installError"]);
    assert!(matches!(
        ctx.log.lock().last(),
        Some(Notification::InstallError(InstallStep::Download))
    ));
    assert_eq!(ctx.launcher.installer_runs(), 0);
}

#[tokio::test]
async fn execute_failure_reports_execute_step() {
    let ctx = setup();
    ctx.serve_installer();
    ctx.launcher.set_installer_fails(true);

    let err = ctx
        .supervisor
        .install(&ctx.installer_path())
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(InstallStep::Execute));
    assert!(matches!(
        ctx.log.lock().last(),
        Some(Notification::InstallError(InstallStep::Execute))
    ));
    assert_eq!(ctx.count("installComplete"), 0);
}
