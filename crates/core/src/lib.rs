// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ace-core: data types shared by the engine connector crates

pub mod assets;
pub mod executable;
pub mod options;
pub mod platform;
pub mod progress;
pub mod status;

pub use assets::{
    AssetConfig, PatchDescriptor, RemoteAsset, DEFAULT_ASSET_BASE_URL, RECOMMENDED_ENGINE_VERSION,
};
pub use executable::{EngineExecutable, PORT_FILE_NAME};
pub use options::{AutoStart, ConnectorOptions, OptionsError, DEFAULT_HTTP_PORT};
pub use platform::HostPlatform;
pub use progress::{DownloadProgress, InstallStep};
pub use status::{ConnectionStatus, EngineStatus, StableStatus, StatusTracker};
