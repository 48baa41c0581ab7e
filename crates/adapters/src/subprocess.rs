// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded helper commands (`reg query` and friends)

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{command} failed: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} timed out after {}ms", timeout.as_millis())]
    TimedOut { command: String, timeout: Duration },
}

/// Run `cmd` to completion, killing it if it outlives `timeout`.
///
/// A non-zero exit is not an error; callers inspect `Output::status`.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    command: &str,
) -> Result<Output, SubprocessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|source| SubprocessError::Spawn {
            command: command.to_string(),
            source,
        }),
        Err(_) => Err(SubprocessError::TimedOut {
            command: command.to_string(),
            timeout,
        }),
    }
}

#[cfg(all(test, unix))]
#[path = "subprocess_tests.rs"]
mod tests;
