// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transfer using `reqwest`.

use super::{ProgressFn, TransferAdapter, TransferError};
use ace_core::DownloadProgress;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Emit progress at most once per this many bytes
const PROGRESS_STEP_BYTES: u64 = 256 * 1024;

#[derive(Clone, Debug)]
pub struct HttpTransfer {
    client: reqwest::Client,
}

impl HttpTransfer {
    pub fn new() -> Result<Self, TransferError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("ace-connector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransferError::Request {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TransferError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransferError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TransferAdapter for HttpTransfer {
    async fn fetch_text(&self, url: &str) -> Result<String, TransferError> {
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| TransferError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(body.trim().to_string())
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressFn<'_>,
    ) -> Result<u64, TransferError> {
        let response = self.get(url).await?;
        let total = response.content_length();
        let inactivity = crate::env::download_inactivity_timeout();

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut transferred: u64 = 0;
        let mut reported: u64 = 0;

        loop {
            let chunk = match tokio::time::timeout(inactivity, stream.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    return Err(TransferError::Request {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
                Ok(None) => break,
                Err(_) => return Err(TransferError::Stalled(inactivity)),
            };

            file.write_all(&chunk).await?;
            transferred += chunk.len() as u64;

            if transferred - reported >= PROGRESS_STEP_BYTES {
                on_progress(DownloadProgress::new(transferred, total));
                reported = transferred;
            }
        }

        file.flush().await?;
        if reported != transferred || transferred == 0 {
            on_progress(DownloadProgress::new(transferred, total));
        }

        tracing::debug!(url, dest = %dest.display(), bytes = transferred, "download complete");
        Ok(transferred)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
