// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote assets and the files they patch.
//!
//! Each [`RemoteAsset`] key resolves, via `GET <base>/<key>`, to a plain-text
//! body holding the real download URL. Keeping the indirection remote lets the
//! download locations move without a new release.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default location of the download-link files.
pub const DEFAULT_ASSET_BASE_URL: &str =
    "https://raw.githubusercontent.com/zardoy/ace-connector/master/src/download-links";

/// Engine version the patches were made against.
pub const RECOMMENDED_ENGINE_VERSION: &str = "3.1.32";

/// Downloadable component published under the asset base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteAsset {
    #[serde(rename = "installer")]
    Installer,
    #[serde(rename = "patchBrowserAds")]
    PatchBrowserAds,
}

impl RemoteAsset {
    pub fn key(&self) -> &'static str {
        match self {
            RemoteAsset::Installer => "installer",
            RemoteAsset::PatchBrowserAds => "patchBrowserAds",
        }
    }
}

impl fmt::Display for RemoteAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A file inside the engine directory that must match a known-good checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDescriptor {
    /// Path relative to the engine directory
    pub relative_path: PathBuf,
    /// Lowercase hex MD5 of the patched file
    pub expected_md5: String,
    /// Asset that replaces the file
    pub replacement: RemoteAsset,
}

impl PatchDescriptor {
    pub fn target_in(&self, engine_dir: &Path) -> PathBuf {
        engine_dir.join(&self.relative_path)
    }

    /// Checksums are compared case-insensitively.
    pub fn matches(&self, checksum: &str) -> bool {
        self.expected_md5.eq_ignore_ascii_case(checksum.trim())
    }
}

/// Immutable asset configuration owned by a supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub base_url: String,
    pub patches: Vec<PatchDescriptor>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            patches: vec![PatchDescriptor {
                relative_path: PathBuf::from("lib").join("acestreamengine.CoreApp.pyd"),
                expected_md5: "ed68c75e473fe2642dbaa058fde1a912".to_string(),
                replacement: RemoteAsset::PatchBrowserAds,
            }],
        }
    }
}

impl AssetConfig {
    /// URL of the link file for `asset`.
    pub fn link_url(&self, asset: RemoteAsset) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), asset.key())
    }
}

#[cfg(test)]
#[path = "assets_tests.rs"]
mod tests;
