// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote asset transfer adapters

mod http;

pub use http::HttpTransfer;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransfer, TransferCall};

use ace_core::DownloadProgress;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from transfers
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("no data received for {}s", .0.as_secs())]
    Stalled(Duration),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Callback receiving download progress
pub type ProgressFn<'a> = &'a (dyn Fn(DownloadProgress) + Send + Sync);

/// Adapter for fetching remote assets
#[async_trait]
pub trait TransferAdapter: Clone + Send + Sync + 'static {
    /// Fetch a small text resource; the body is returned trimmed
    async fn fetch_text(&self, url: &str) -> Result<String, TransferError>;

    /// Stream `url` into `dest`, reporting progress. Returns the byte count.
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressFn<'_>,
    ) -> Result<u64, TransferError>;
}
