// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration fixed at construction.

use ace_core::AssetConfig;
use std::time::Duration;

/// Delays used by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait after the port file disappears before reconnecting
    pub reconnect_delay: Duration,
    /// Wait after an automatic install before retrying the connection
    pub install_settle: Duration,
}

impl Timing {
    /// Defaults, overridable through `ACE_RECONNECT_DELAY_MS` and `ACE_INSTALL_SETTLE_MS`
    pub fn from_env() -> Self {
        Self {
            reconnect_delay: crate::env::reconnect_delay(),
            install_settle: crate::env::install_settle_delay(),
        }
    }

    /// Zero delays, for tests
    pub fn immediate() -> Self {
        Self {
            reconnect_delay: Duration::ZERO,
            install_settle: Duration::ZERO,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Asset locations and timing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub assets: AssetConfig,
    pub timing: Timing,
}
