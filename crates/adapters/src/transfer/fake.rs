// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transfer adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProgressFn, TransferAdapter, TransferError};
use ace_core::DownloadProgress;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded transfer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferCall {
    FetchText { url: String },
    Download { url: String, dest: PathBuf },
}

#[derive(Default)]
struct FakeTransferState {
    texts: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    calls: Vec<TransferCall>,
}

/// Fake transfer adapter serving scripted responses; unknown URLs yield 404
#[derive(Clone, Default)]
pub struct FakeTransfer {
    inner: Arc<Mutex<FakeTransferState>>,
}

impl FakeTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` from `fetch_text(url)`
    pub fn set_text(&self, url: &str, body: &str) {
        self.inner
            .lock()
            .texts
            .insert(url.to_string(), body.to_string());
    }

    /// Serve `bytes` from `download(url, ..)`
    pub fn set_file(&self, url: &str, bytes: &[u8]) {
        self.inner
            .lock()
            .files
            .insert(url.to_string(), bytes.to_vec());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TransferCall> {
        self.inner.lock().calls.clone()
    }

    /// Download calls only
    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                TransferCall::Download { url, dest } => Some((url.clone(), dest.clone())),
                TransferCall::FetchText { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl TransferAdapter for FakeTransfer {
    async fn fetch_text(&self, url: &str) -> Result<String, TransferError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TransferCall::FetchText {
            url: url.to_string(),
        });
        inner
            .texts
            .get(url)
            .map(|body| body.trim().to_string())
            .ok_or_else(|| TransferError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressFn<'_>,
    ) -> Result<u64, TransferError> {
        let bytes = {
            let mut inner = self.inner.lock();
            inner.calls.push(TransferCall::Download {
                url: url.to_string(),
                dest: dest.to_path_buf(),
            });
            inner.files.get(url).cloned()
        };
        let bytes = bytes.ok_or_else(|| TransferError::Status {
            url: url.to_string(),
            status: 404,
        })?;

        tokio::fs::write(dest, &bytes).await?;
        let len = bytes.len() as u64;
        on_progress(DownloadProgress::new(len, Some(len)));
        Ok(len)
    }
}
