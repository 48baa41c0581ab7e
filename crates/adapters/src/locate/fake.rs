// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake path resolver for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PathResolver, ResolveError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
struct FakeResolverState {
    path: Option<PathBuf>,
    error: Option<String>,
    lookups: usize,
}

/// Fake path resolver for testing
#[derive(Clone, Default)]
pub struct FakePathResolver {
    inner: Arc<Mutex<FakeResolverState>>,
}

impl FakePathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that reports `path` as the installed engine
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let resolver = Self::new();
        resolver.set_path(Some(path.into()));
        resolver
    }

    pub fn set_path(&self, path: Option<PathBuf>) {
        self.inner.lock().path = path;
    }

    /// Make subsequent lookups fail
    pub fn set_error(&self, error: Option<&str>) {
        self.inner.lock().error = error.map(str::to_string);
    }

    /// Number of lookups performed
    pub fn lookups(&self) -> usize {
        self.inner.lock().lookups
    }
}

#[async_trait]
impl PathResolver for FakePathResolver {
    async fn engine_path(&self) -> Result<Option<PathBuf>, ResolveError> {
        let mut inner = self.inner.lock();
        inner.lookups += 1;
        if let Some(error) = &inner.error {
            return Err(ResolveError::LookupFailed(error.clone()));
        }
        Ok(inner.path.clone())
    }
}
