// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Health probe request timeout (default: 5000ms).
pub fn probe_timeout() -> Duration {
    parse_duration_ms("ACE_PROBE_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for `reg query` (default: 10000ms).
#[cfg_attr(windows, allow(dead_code))]
pub fn registry_timeout() -> Duration {
    parse_duration_ms("ACE_REG_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
}

/// Abort a download after this long without data (default: 300000ms).
pub fn download_inactivity_timeout() -> Duration {
    parse_duration_ms("ACE_DOWNLOAD_INACTIVITY_MS").unwrap_or(Duration::from_secs(300))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
