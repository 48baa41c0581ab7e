// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine connection status.
//!
//! [`EngineStatus`] is the single value exposed to consumers. It is only
//! mutated through [`StatusTracker::apply`], which also remembers the last
//! *stable* status (`connected` or `disconnected`) so a caller can tell
//! "checking, was connected" apart from "checking, was disconnected".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Public connection status, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Checking,
    Disconnected,
    Starting,
    Connected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "checking",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Starting => "starting",
            ConnectionStatus::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine status; `Connected` carries the version reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EngineStatus {
    Checking,
    #[default]
    Disconnected,
    Starting,
    Connected {
        version: String,
    },
}

impl EngineStatus {
    pub fn connected(version: impl Into<String>) -> Self {
        EngineStatus::Connected {
            version: version.into(),
        }
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        match self {
            EngineStatus::Checking => ConnectionStatus::Checking,
            EngineStatus::Disconnected => ConnectionStatus::Disconnected,
            EngineStatus::Starting => ConnectionStatus::Starting,
            EngineStatus::Connected { .. } => ConnectionStatus::Connected,
        }
    }

    /// Version reported by a connected engine.
    pub fn version(&self) -> Option<&str> {
        match self {
            EngineStatus::Connected { version } => Some(version),
            _ => None,
        }
    }

    /// Returns the stable counterpart of this status, if it is one.
    pub fn stable(&self) -> Option<StableStatus> {
        match self {
            EngineStatus::Connected { .. } => Some(StableStatus::Connected),
            EngineStatus::Disconnected => Some(StableStatus::Disconnected),
            EngineStatus::Checking | EngineStatus::Starting => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, EngineStatus::Connected { .. })
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Connected { version } => write!(f, "connected (v{})", version),
            other => f.write_str(other.connection_status().as_str()),
        }
    }
}

/// A settled status: the engine was last seen up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StableStatus {
    Connected,
    Disconnected,
}

impl From<StableStatus> for ConnectionStatus {
    fn from(stable: StableStatus) -> Self {
        match stable {
            StableStatus::Connected => ConnectionStatus::Connected,
            StableStatus::Disconnected => ConnectionStatus::Disconnected,
        }
    }
}

/// Current status plus the last stable one.
///
/// `last_stable` is `None` until the first stable status has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTracker {
    current: EngineStatus,
    last_stable: Option<StableStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &EngineStatus {
        &self.current
    }

    pub fn last_stable(&self) -> Option<StableStatus> {
        self.last_stable
    }

    /// Replace the current status, returning the value to announce.
    pub fn apply(&mut self, status: EngineStatus) -> ConnectionStatus {
        if let Some(stable) = status.stable() {
            self.last_stable = Some(stable);
        }
        let announced = status.connection_status();
        self.current = status;
        announced
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
