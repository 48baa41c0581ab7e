//! Install specs: downloading and running the engine installer.

use crate::prelude::*;
use std::sync::{Arc, Mutex};

const INSTALLER_LINK: &str = "https://cdn.test/setup.exe";

#[tokio::test]
async fn install_runs_downloaded_installer() {
    let h = Harness::new();
    h.serve_asset("installer", INSTALLER_LINK, b"MZ");
    let save = h.engine_dir().join("setup.exe");

    h.supervisor.install(&save).await.unwrap();

    assert_eq!(h.launcher.calls(), vec![LaunchCall::RunInstaller { path: save }]);
    assert_eq!(h.count("installComplete"), 1);
}

#[tokio::test]
async fn intercepted_launch_runs_only_when_caller_decides() {
    let h = Harness::new();
    h.serve_asset("installer", INSTALLER_LINK, b"MZ");
    let handle = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&handle);
    h.supervisor.subscribe(move |n: &Notification| {
        if let Notification::InstallerDownloaded(payload) = n {
            *sink.lock().unwrap() = payload.handle_launch_manually();
        }
    });

    let supervisor = h.supervisor.clone();
    let save = h.engine_dir().join("setup.exe");
    let install = tokio::spawn(async move { supervisor.install(&save).await });

    wait_until(|| handle.lock().unwrap().is_some()).await;
    assert_eq!(h.launcher.installer_runs(), 0);

    let launch = handle.lock().unwrap().take().unwrap();
    launch.launch().await;
    install.await.unwrap().unwrap();

    assert_eq!(h.launcher.installer_runs(), 1);
}

#[tokio::test]
async fn download_failure_is_reported_as_download_step() {
    let h = Harness::new();

    let err = h
        .supervisor
        .install(&h.engine_dir().join("setup.exe"))
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(InstallStep::Download));
    assert!(h
        .notifications()
        .iter()
        .any(|n| matches!(n, Notification::InstallError(InstallStep::Download))));
}

#[tokio::test]
async fn installer_failure_is_reported_as_execute_step() {
    let h = Harness::new();
    h.serve_asset("installer", INSTALLER_LINK, b"MZ");
    h.launcher.set_installer_fails(true);

    let err = h
        .supervisor
        .install(&h.engine_dir().join("setup.exe"))
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(InstallStep::Execute));
}
