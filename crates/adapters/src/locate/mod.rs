// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine path resolution

mod registry;

pub use registry::{
    decode_reg_output, parse_reg_query, split_hive, RegistryHive, RegistryPathResolver,
    ENGINE_REGISTRY_KEY, ENGINE_REGISTRY_VALUE,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePathResolver;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from path resolution
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("path lookup failed: {0}")]
    LookupFailed(String),
}

/// Adapter that knows where the engine executable is installed
#[async_trait]
pub trait PathResolver: Clone + Send + Sync + 'static {
    /// Path of the engine executable, or `None` when no installation is recorded
    async fn engine_path(&self) -> Result<Option<PathBuf>, ResolveError>;
}
