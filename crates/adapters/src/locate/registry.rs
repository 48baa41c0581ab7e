// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry-backed path resolver.
//!
//! On Windows the value is read through the registry API, which hands back
//! UTF-16 text. Elsewhere (tests, compatibility layers) `reg query` is run and
//! its output must be valid UTF-8; lossy decoding would turn a non-ASCII
//! install path into one that does not exist.

use super::{PathResolver, ResolveError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Registry key written by the engine installer.
pub const ENGINE_REGISTRY_KEY: &str = r"HKCU\SOFTWARE\AceStream";

/// Value under [`ENGINE_REGISTRY_KEY`] holding the executable path.
pub const ENGINE_REGISTRY_VALUE: &str = "EnginePath";

/// Root hive of a registry key path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryHive {
    CurrentUser,
    LocalMachine,
}

/// Split `HKCU\SOFTWARE\AceStream` into its hive and subkey.
pub fn split_hive(key: &str) -> Option<(RegistryHive, &str)> {
    let (root, subkey) = key.split_once('\\')?;
    let hive = match root.to_ascii_uppercase().as_str() {
        "HKCU" | "HKEY_CURRENT_USER" => RegistryHive::CurrentUser,
        "HKLM" | "HKEY_LOCAL_MACHINE" => RegistryHive::LocalMachine,
        _ => return None,
    };
    (!subkey.is_empty()).then_some((hive, subkey))
}

#[derive(Clone, Debug)]
pub struct RegistryPathResolver {
    key: String,
    value: String,
}

impl Default for RegistryPathResolver {
    fn default() -> Self {
        Self::new(ENGINE_REGISTRY_KEY, ENGINE_REGISTRY_VALUE)
    }
}

impl RegistryPathResolver {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    #[cfg(windows)]
    async fn lookup(&self) -> Result<Option<PathBuf>, ResolveError> {
        let (hive, subkey) = split_hive(&self.key)
            .ok_or_else(|| ResolveError::LookupFailed(format!("bad key: {}", self.key)))?;
        let subkey = subkey.to_string();
        let value = self.value.clone();
        tokio::task::spawn_blocking(move || api::read_string(hive, &subkey, &value))
            .await
            .map_err(|e| ResolveError::LookupFailed(e.to_string()))?
    }

    #[cfg(not(windows))]
    async fn lookup(&self) -> Result<Option<PathBuf>, ResolveError> {
        use crate::subprocess::run_with_timeout;
        use tokio::process::Command;

        let mut cmd = Command::new("reg");
        cmd.args(["query", &self.key, "/v", &self.value]);
        let output = run_with_timeout(cmd, crate::env::registry_timeout(), "reg query")
            .await
            .map_err(|e| ResolveError::LookupFailed(e.to_string()))?;

        if !output.status.success() {
            // reg exits non-zero when the key or value does not exist
            tracing::debug!(
                key = %self.key,
                value = %self.value,
                exit_code = ?output.status.code(),
                "registry value not found"
            );
            return Ok(None);
        }

        let stdout = decode_reg_output(output.stdout)?;
        Ok(parse_reg_query(&stdout, &self.value))
    }
}

#[async_trait]
impl PathResolver for RegistryPathResolver {
    async fn engine_path(&self) -> Result<Option<PathBuf>, ResolveError> {
        self.lookup().await
    }
}

#[cfg(windows)]
mod api {
    use super::{RegistryHive, ResolveError};
    use std::io::ErrorKind;
    use std::path::PathBuf;
    use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ};
    use winreg::RegKey;

    pub(super) fn read_string(
        hive: RegistryHive,
        subkey: &str,
        value: &str,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let root = RegKey::predef(match hive {
            RegistryHive::CurrentUser => HKEY_CURRENT_USER,
            RegistryHive::LocalMachine => HKEY_LOCAL_MACHINE,
        });
        let key = match root.open_subkey_with_flags(subkey, KEY_READ) {
            Ok(key) => key,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ResolveError::LookupFailed(e.to_string())),
        };
        match key.get_value::<String, _>(value) {
            Ok(path) => {
                let path = path.trim();
                Ok((!path.is_empty()).then(|| PathBuf::from(path)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ResolveError::LookupFailed(e.to_string())),
        }
    }
}

/// `reg query` output as text; undecodable bytes are an error, not replaced.
pub fn decode_reg_output(stdout: Vec<u8>) -> Result<String, ResolveError> {
    String::from_utf8(stdout).map_err(|e| {
        ResolveError::LookupFailed(format!("reg query output is not UTF-8: {}", e.utf8_error()))
    })
}

/// Extract a string value from `reg query` output.
///
/// Lines look like `    EnginePath    REG_SZ    C:\Program Files\...\ace_engine.exe`;
/// the value may itself contain spaces.
pub fn parse_reg_query(output: &str, value_name: &str) -> Option<PathBuf> {
    output.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(value_name)?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let (kind, value) = rest.trim_start().split_once(char::is_whitespace)?;
        if !kind.starts_with("REG_") {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| PathBuf::from(value))
    })
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
