// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Download progress and install step types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a streamed download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub transferred: u64,
    /// Content length, when the server announced one
    pub total: Option<u64>,
}

impl DownloadProgress {
    pub fn new(transferred: u64, total: Option<u64>) -> Self {
        Self { transferred, total }
    }

    /// Completed fraction in `0.0..=1.0`, if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some((self.transferred as f64 / total as f64).min(1.0)),
            None => None,
        }
    }

    pub fn percent(&self) -> Option<f64> {
        self.fraction().map(|f| f * 100.0)
    }
}

/// Step of the install flow that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStep {
    /// Network failure while fetching the installer
    Download,
    /// Local failure while running the installer
    Execute,
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallStep::Download => write!(f, "download"),
            InstallStep::Execute => write!(f, "execute"),
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
