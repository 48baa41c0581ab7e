// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process adapter backed by `sysinfo`.

use super::{process_name_matches, ProcessAdapter, ProcessError, ProcessInfo};
use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProcessAdapter;

impl SystemProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for SystemProcessAdapter {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProcessInfo>, ProcessError> {
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let mut system = System::new();
            system.refresh_processes_specifics(
                ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::nothing(),
            );
            system
                .processes()
                .iter()
                .find(|(_, process)| {
                    process_name_matches(&process.name().to_string_lossy(), &name)
                })
                .map(|(pid, process)| ProcessInfo {
                    pid: pid.as_u32(),
                    name: process.name().to_string_lossy().into_owned(),
                })
        })
        .await
        .map_err(|e| ProcessError::ListFailed(e.to_string()))
    }

    async fn kill(&self, pid: u32) -> Result<(), ProcessError> {
        tokio::task::spawn_blocking(move || {
            let target = Pid::from_u32(pid);
            let mut system = System::new();
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[target]),
                true,
                ProcessRefreshKind::nothing(),
            );
            match system.process(target) {
                Some(process) if process.kill() => Ok(()),
                Some(_) => Err(ProcessError::KillFailed {
                    pid,
                    reason: "signal not delivered".to_string(),
                }),
                // Already exited
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| ProcessError::KillFailed {
            pid,
            reason: e.to_string(),
        })?
    }
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
