// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connector options.
//!
//! Set once at construction and never mutated afterwards. Field names follow
//! the camelCase surface (`autoStart`, `checkForPatch`, `httpPort`, ...) so a
//! host can keep its options in a TOML file.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default HTTP port of the engine's local API.
pub const DEFAULT_HTTP_PORT: u16 = 6878;

/// Errors from loading options
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid options: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Auto-start behaviour. Absent (`None` in [`ConnectorOptions::auto_start`])
/// disables both auto-start and port-file watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoStart {
    /// Start the engine from `connect()` when it is not running
    pub on_connect: bool,
    /// Reconnect (and so restart the engine) after its port file disappears
    pub on_suspend: bool,
}

impl Default for AutoStart {
    fn default() -> Self {
        Self {
            on_connect: true,
            on_suspend: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorOptions {
    #[serde(deserialize_with = "deserialize_auto_start")]
    pub auto_start: Option<AutoStart>,
    pub check_for_patch: bool,
    pub http_port: u16,
    /// Explicit engine executable; the registry is consulted when unset
    pub ace_engine_executable_path: Option<PathBuf>,
    pub auto_install: bool,
    /// Reserved: not enforced yet
    pub max_start_retries: u32,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            auto_start: Some(AutoStart::default()),
            check_for_patch: true,
            http_port: DEFAULT_HTTP_PORT,
            ace_engine_executable_path: None,
            auto_install: false,
            max_start_retries: 3,
        }
    }
}

impl ConnectorOptions {
    /// Parse options from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the port file is watched at all
    pub fn watch_enabled(&self) -> bool {
        self.auto_start.is_some()
    }

    pub fn start_on_connect(&self) -> bool {
        self.auto_start.is_some_and(|a| a.on_connect)
    }

    pub fn restart_on_suspend(&self) -> bool {
        self.auto_start.is_some_and(|a| a.on_suspend)
    }
}

/// Accepts a table, a boolean (`false` disables, `true` means defaults), or null.
fn deserialize_auto_start<'de, D>(deserializer: D) -> Result<Option<AutoStart>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Table(AutoStart),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        None | Some(Repr::Flag(false)) => None,
        Some(Repr::Flag(true)) => Some(AutoStart::default()),
        Some(Repr::Table(auto_start)) => Some(auto_start),
    })
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
