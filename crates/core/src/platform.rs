// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host operating system family.

use std::fmt;

/// Operating system family the supervisor runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostPlatform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::MacOs,
            "linux" => HostPlatform::Linux,
            _ => HostPlatform::Other,
        }
    }

    /// The engine only ships for Windows.
    pub fn is_supported(&self) -> bool {
        matches!(self, HostPlatform::Windows)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::MacOs => write!(f, "macos"),
            HostPlatform::Linux => write!(f, "linux"),
            HostPlatform::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
