// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn spawn_engine_runs_in_executable_dir() {
    let dir = tempfile::tempdir().unwrap();
    let engine = script(dir.path(), "engine.sh", "touch started");

    let pid = CommandLauncher::new().spawn_engine(&engine).await.unwrap();
    assert!(pid.is_some());

    let marker = dir.path().join("started");
    for _ in 0..50 {
        if marker.exists() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("engine script never ran");
}

#[tokio::test]
async fn spawn_engine_missing_binary_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = CommandLauncher::new()
        .spawn_engine(&dir.path().join("missing.exe"))
        .await;
    assert!(matches!(result, Err(LaunchError::Spawn { .. })));
}

#[tokio::test]
async fn run_installer_success() {
    let dir = tempfile::tempdir().unwrap();
    let installer = script(dir.path(), "setup.sh", "exit 0");
    CommandLauncher::new().run_installer(&installer).await.unwrap();
}

#[tokio::test]
async fn run_installer_nonzero_exit_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let installer = script(dir.path(), "setup.sh", "exit 3");

    let err = CommandLauncher::new()
        .run_installer(&installer)
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::ExitStatus { .. }));
    assert!(err.to_string().contains("setup.sh"));
}

#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn reaped_engine_exit_is_logged_with_its_path() {
    let sink = LogSink::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let dir = tempfile::tempdir().unwrap();
    let engine = script(dir.path(), "engine.sh", "exit 0");

    tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(async {
                CommandLauncher::new().spawn_engine(&engine).await.unwrap();
                for _ in 0..100 {
                    let logs = String::from_utf8_lossy(&sink.0.lock().unwrap()).to_string();
                    if logs.contains("engine process exited") {
                        assert!(logs.contains("engine.sh"), "logs: {logs}");
                        return;
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                }
                panic!("engine exit was never logged");
            })
    });
}
