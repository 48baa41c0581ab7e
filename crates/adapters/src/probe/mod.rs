// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine health probe adapters

mod http;

pub use http::{version_url, HttpHealthProbe};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHealthProbe;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a health probe
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("engine responded with HTTP {0}")]
    Status(u16),
    #[error("engine reported an error: {0}")]
    Engine(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Adapter that asks the engine's local API for its version
#[async_trait]
pub trait HealthProbe: Clone + Send + Sync + 'static {
    /// Version string reported by the engine listening on `port`
    async fn get_version(&self, port: u16) -> Result<String, ProbeError>;
}

/// Interpret a `get_version` response body.
///
/// Success requires a falsy `error` and a string `result.version`.
pub fn parse_version_response(body: &serde_json::Value) -> Result<String, ProbeError> {
    if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ProbeError::Engine(message));
    }

    body.get("result")
        .and_then(|r| r.get("version"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ProbeError::Malformed("missing result.version".to_string()))
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
