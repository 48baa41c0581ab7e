// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::supervisor::patch::{move_into_place, staging_path};
use crate::test_helpers::{setup_with, ASSET_BASE};
use crate::PatchError;
use ace_core::{PatchDescriptor, RemoteAsset};
use std::path::{Path, PathBuf};

const PATCH_TARGET: &str = "lib/acestreamengine.CoreApp.pyd";
const PATCH_LINK: &str = "https://cdn.test/CoreApp.pyd";
/// MD5 of "abc"
const ABC_MD5: &str = "900150983cd24fb0d6963f7d28e17f72";

impl TestContext {
    fn write_patch_target(&self, contents: &[u8]) -> PathBuf {
        let target = self.engine_dir.path().join(PATCH_TARGET);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, contents).unwrap();
        target
    }

    fn serve_patch(&self, contents: &[u8]) {
        self.transfer
            .set_text(&format!("{ASSET_BASE}/patchBrowserAds"), PATCH_LINK);
        self.transfer.set_file(PATCH_LINK, contents);
    }
}

fn config_expecting(md5: &str) -> SupervisorConfig {
    let mut config = test_config();
    config.assets.patches = vec![PatchDescriptor {
        relative_path: PathBuf::from(PATCH_TARGET),
        expected_md5: md5.to_string(),
        replacement: RemoteAsset::PatchBrowserAds,
    }];
    config
}

#[tokio::test]
async fn mismatched_checksum_patches_once_before_start() {
    let ctx = setup();
    let target = ctx.write_patch_target(b"unpatched engine module");
    ctx.serve_patch(b"patched engine module");

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(ctx.count("patchAvailable"), 1);
    assert_eq!(ctx.count("autoPatchCompleted"), 1);
    assert_eq!(ctx.transfer.downloads().len(), 1);
    assert_eq!(std::fs::read(&target).unwrap(), b"patched engine module");
    assert!(!staging_path(&target).exists());
    assert_eq!(
        ctx.names(),
        vec!["updateStatus", "patchAvailable", "autoPatchCompleted"]
    );
    assert_eq!(ctx.launcher.engine_spawns(), 1);
}

#[tokio::test]
async fn missing_target_never_patches() {
    let ctx = setup();
    ctx.serve_patch(b"patched");

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(ctx.count("patchAvailable"), 0);
    assert!(ctx.transfer.calls().is_empty());
}

#[tokio::test]
async fn matching_checksum_is_left_alone() {
    let ctx = setup_with(ConnectorOptions::default(), config_expecting(ABC_MD5));
    ctx.write_patch_target(b"abc");

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(ctx.count("patchAvailable"), 0);
    assert!(ctx.transfer.calls().is_empty());
}

#[tokio::test]
async fn checksum_compare_ignores_case() {
    let ctx = setup_with(
        ConnectorOptions::default(),
        config_expecting(&ABC_MD5.to_uppercase()),
    );
    ctx.write_patch_target(b"abc");

    ctx.supervisor.connect().await.unwrap();
    assert_eq!(ctx.count("patchAvailable"), 0);
}

#[tokio::test]
async fn patch_check_disabled_skips_checksums() {
    let ctx = setup_with_options(ConnectorOptions {
        check_for_patch: false,
        ..ConnectorOptions::default()
    });
    ctx.write_patch_target(b"unpatched");

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(ctx.count("patchAvailable"), 0);
    assert!(ctx.transfer.calls().is_empty());
}

#[tokio::test]
async fn failed_download_keeps_target_and_aborts_connect() {
    let ctx = setup();
    let target = ctx.write_patch_target(b"unpatched");
    ctx.transfer
        .set_text(&format!("{ASSET_BASE}/patchBrowserAds"), PATCH_LINK);

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert!(matches!(err, ConnectError::Patch(PatchError::Download(_))));
    assert_eq!(std::fs::read(&target).unwrap(), b"unpatched");
    assert!(!staging_path(&target).exists());
    assert_eq!(ctx.count("patchAvailable"), 1);
    assert_eq!(ctx.count("autoPatchCompleted"), 0);
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn unexpected_replacement_checksum_is_not_fatal() {
    let ctx = setup_with(ConnectorOptions::default(), config_expecting(ABC_MD5));
    let target = ctx.write_patch_target(b"old");
    ctx.serve_patch(b"not abc");

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"not abc");
    assert_eq!(ctx.count("autoPatchCompleted"), 1);
}

#[tokio::test]
async fn patch_engine_without_executable_is_noop() {
    let ctx = setup();
    assert!(!ctx.supervisor.patch_engine().await.unwrap());
    assert!(ctx.transfer.calls().is_empty());
}

#[tokio::test]
async fn patch_engine_after_connect() {
    let ctx = setup_with_options(ConnectorOptions {
        check_for_patch: false,
        ..ConnectorOptions::default()
    });
    ctx.supervisor.connect().await.unwrap();
    let target = ctx.write_patch_target(b"unpatched");
    ctx.serve_patch(b"patched");

    assert!(ctx.supervisor.patch_engine().await.unwrap());
    assert_eq!(std::fs::read(&target).unwrap(), b"patched");
    assert_eq!(ctx.count("patchAvailable"), 0);
    assert_eq!(ctx.count("autoPatchCompleted"), 1);
}

#[tokio::test]
async fn running_engine_is_stopped_before_patching_then_restarted() {
    let ctx = setup();
    ctx.engine_running(42);
    ctx.probe.set_version(Some("3.1.32"));
    let target = ctx.write_patch_target(b"unpatched");
    ctx.serve_patch(b"patched");

    ctx.supervisor.connect().await.unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"patched");
    assert_eq!(ctx.processes.kills(), vec![42]);
    assert!(!ctx.processes.is_running(42));
    assert_eq!(ctx.launcher.engine_spawns(), 1);
    assert!(ctx.probe.probes().is_empty());
    assert_eq!(
        ctx.names(),
        vec!["updateStatus", "patchAvailable", "autoPatchCompleted"]
    );
}

#[tokio::test]
async fn engine_is_not_stopped_when_nothing_needs_patching() {
    let ctx = setup_with(ConnectorOptions::default(), config_expecting(ABC_MD5));
    ctx.engine_running(42);
    ctx.probe.set_version(Some("3.1.32"));
    ctx.write_patch_target(b"abc");

    ctx.supervisor.connect().await.unwrap();

    assert!(ctx.processes.kills().is_empty());
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn process_lookup_failure_before_patching_aborts_connect() {
    let ctx = setup();
    let target = ctx.write_patch_target(b"unpatched");
    ctx.serve_patch(b"patched");
    ctx.processes.set_list_error(Some("access denied"));

    let err = ctx.supervisor.connect().await.unwrap_err();

    assert!(matches!(err, ConnectError::Patch(PatchError::StopEngine(_))));
    assert_eq!(std::fs::read(&target).unwrap(), b"unpatched");
    assert!(ctx.transfer.downloads().is_empty());
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn patch_engine_stops_running_engine() {
    let ctx = setup_with_options(ConnectorOptions {
        check_for_patch: false,
        ..ConnectorOptions::default()
    });
    ctx.engine_running(42);
    ctx.probe.set_version(Some("3.1.32"));
    ctx.supervisor.connect().await.unwrap();
    ctx.write_patch_target(b"unpatched");
    ctx.serve_patch(b"patched");

    assert!(ctx.supervisor.patch_engine().await.unwrap());
    assert_eq!(ctx.processes.kills(), vec![42]);
    assert_eq!(ctx.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn failed_replace_removes_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("CoreApp.pyd");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("held"), b"in use").unwrap();
    let staging = staging_path(&target);
    std::fs::write(&staging, b"patched").unwrap();

    assert!(move_into_place(&staging, &target).await.is_err());

    assert!(!staging.exists());
    assert!(target.join("held").exists());
}

#[tokio::test]
async fn replace_moves_staging_over_target() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("CoreApp.pyd");
    std::fs::write(&target, b"unpatched").unwrap();
    let staging = staging_path(&target);
    std::fs::write(&staging, b"patched").unwrap();

    move_into_place(&staging, &target).await.unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"patched");
    assert!(!staging.exists());
}

#[test]
fn staging_path_is_a_sibling() {
    assert_eq!(
        staging_path(Path::new("/ace/lib/core.pyd")),
        PathBuf::from("/ace/lib/core.pyd.download")
    );
}
