// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved engine executable.

use std::path::{Path, PathBuf};

/// Name of the file the engine keeps in its directory while it is running.
pub const PORT_FILE_NAME: &str = "acestream.port";

/// Engine executable and the directory it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineExecutable {
    pub path: PathBuf,
    pub dir: PathBuf,
}

impl EngineExecutable {
    /// Build from an executable path; the directory is its parent.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self { path, dir }
    }

    /// File name used to recognise the engine among running processes.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn port_file(&self) -> PathBuf {
        self.dir.join(PORT_FILE_NAME)
    }
}

#[cfg(test)]
#[path = "executable_tests.rs"]
mod tests;
