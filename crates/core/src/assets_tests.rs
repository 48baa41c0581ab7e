// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    installer = { RemoteAsset::Installer, "installer" },
    patch     = { RemoteAsset::PatchBrowserAds, "patchBrowserAds" },
)]
fn asset_keys(asset: RemoteAsset, key: &str) {
    assert_eq!(asset.key(), key);
    assert_eq!(asset.to_string(), key);
}

#[yare::parameterized(
    no_slash       = { "https://assets.test/links" },
    trailing_slash = { "https://assets.test/links/" },
)]
fn link_url_joins_without_double_slash(base: &str) {
    let config = AssetConfig {
        base_url: base.to_string(),
        patches: Vec::new(),
    };
    assert_eq!(
        config.link_url(RemoteAsset::Installer),
        "https://assets.test/links/installer"
    );
}

#[test]
fn default_config_has_core_app_patch() {
    let config = AssetConfig::default();
    assert_eq!(config.patches.len(), 1);

    let patch = &config.patches[0];
    assert_eq!(patch.expected_md5, "ed68c75e473fe2642dbaa058fde1a912");
    assert_eq!(patch.replacement, RemoteAsset::PatchBrowserAds);
    assert_eq!(
        patch.target_in(Path::new("engine")),
        Path::new("engine").join("lib").join("acestreamengine.CoreApp.pyd")
    );
}

#[yare::parameterized(
    exact      = { "ed68c75e473fe2642dbaa058fde1a912", true },
    uppercase  = { "ED68C75E473FE2642DBAA058FDE1A912", true },
    whitespace = { "ed68c75e473fe2642dbaa058fde1a912\n", true },
    different  = { "deadbeef", false },
)]
fn patch_checksum_match(checksum: &str, expected: bool) {
    let patch = &AssetConfig::default().patches[0];
    assert_eq!(patch.matches(checksum), expected);
}
