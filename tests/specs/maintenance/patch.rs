//! Patch specs: keeping the engine module at its known-good checksum.

use crate::prelude::*;

const PATCH_LINK: &str = "https://cdn.test/CoreApp.pyd";

#[tokio::test]
async fn differing_checksum_is_patched_before_start() {
    let h = Harness::new();
    let target = h.write_file(PATCH_TARGET, b"deadbeef");
    h.serve_asset("patchBrowserAds", PATCH_LINK, b"patched module");

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.count("patchAvailable"), 1);
    assert_eq!(h.transfer.downloads().len(), 1);
    assert_eq!(std::fs::read(&target).unwrap(), b"patched module");
    assert_eq!(
        h.names(),
        vec!["updateStatus", "patchAvailable", "autoPatchCompleted"]
    );
    assert_eq!(h.launcher.engine_spawns(), 1);
}

#[tokio::test]
async fn absent_module_is_not_patched() {
    let h = Harness::new();
    h.serve_asset("patchBrowserAds", PATCH_LINK, b"patched module");

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.count("patchAvailable"), 0);
    assert!(h.transfer.downloads().is_empty());
}

#[tokio::test]
async fn patch_failure_blocks_start() {
    let h = Harness::new();
    let target = h.write_file(PATCH_TARGET, b"deadbeef");

    let err = h.supervisor.connect().await.unwrap_err();

    assert!(matches!(err, ConnectError::Patch(_)));
    assert_eq!(std::fs::read(&target).unwrap(), b"deadbeef");
    assert_eq!(h.launcher.engine_spawns(), 0);
}

#[tokio::test]
async fn matching_checksum_is_left_alone() {
    let mut config = spec_config();
    config.assets.patches[0].expected_md5 = "900150983cd24fb0d6963f7d28e17f72".to_string();
    let h = Harness::with(ConnectorOptions::default(), config);
    h.write_file(PATCH_TARGET, b"abc");

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.count("patchAvailable"), 0);
    assert!(h.transfer.calls().is_empty());
}

#[tokio::test]
async fn disabled_patch_check_skips_differing_module() {
    let h = Harness::with_options(ConnectorOptions {
        check_for_patch: false,
        ..ConnectorOptions::default()
    });
    h.write_file(PATCH_TARGET, b"deadbeef");

    h.supervisor.connect().await.unwrap();

    assert_eq!(h.count("patchAvailable"), 0);
    assert_eq!(h.launcher.engine_spawns(), 1);
}

#[tokio::test]
async fn running_engine_is_restarted_on_the_patched_module() {
    let h = Harness::new();
    h.engine_running(500);
    h.engine_answers("3.1.32");
    let target = h.write_file(PATCH_TARGET, b"deadbeef");
    h.serve_asset("patchBrowserAds", PATCH_LINK, b"patched module");

    h.supervisor.connect().await.unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"patched module");
    assert_eq!(h.processes.kills(), vec![500]);
    assert_eq!(h.launcher.engine_spawns(), 1);
    assert_eq!(h.supervisor.status(), EngineStatus::Checking);
}
