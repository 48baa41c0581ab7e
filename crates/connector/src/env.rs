// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the supervisor.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Delay before reconnecting after the port file disappears (default: 5000ms).
pub fn reconnect_delay() -> Duration {
    parse_duration_ms("ACE_RECONNECT_DELAY_MS").unwrap_or(Duration::from_secs(5))
}

/// Pause between a finished install and the retried connect (default: 1000ms).
pub fn install_settle_delay() -> Duration {
    parse_duration_ms("ACE_INSTALL_SETTLE_MS").unwrap_or(Duration::from_secs(1))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
