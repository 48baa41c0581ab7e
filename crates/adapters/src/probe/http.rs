// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP health probe.

use super::{parse_version_response, HealthProbe, ProbeError};
use async_trait::async_trait;

/// URL of the version endpoint for an engine on `port`.
pub fn version_url(port: u16) -> String {
    format!("http://localhost:{port}/webui/api/service?method=get_version")
}

#[derive(Clone, Debug)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
}

impl HttpHealthProbe {
    pub fn new() -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(crate::env::probe_timeout())
            .build()
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn get_version(&self, port: u16) -> Result<String, ProbeError> {
        let response = self
            .client
            .get(version_url(port))
            .send()
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;
        parse_version_response(&body)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
