// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake health probe for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HealthProbe, ProbeError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct FakeProbeState {
    version: Option<String>,
    probes: Vec<u16>,
}

/// Fake health probe; unreachable until a version is set
#[derive(Clone, Default)]
pub struct FakeHealthProbe {
    inner: Arc<Mutex<FakeProbeState>>,
}

impl FakeHealthProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe that reports a reachable engine with `version`
    pub fn reachable(version: &str) -> Self {
        let probe = Self::new();
        probe.set_version(Some(version));
        probe
    }

    /// `None` makes the engine unreachable
    pub fn set_version(&self, version: Option<&str>) {
        self.inner.lock().version = version.map(str::to_string);
    }

    /// Ports probed, in order
    pub fn probes(&self) -> Vec<u16> {
        self.inner.lock().probes.clone()
    }
}

#[async_trait]
impl HealthProbe for FakeHealthProbe {
    async fn get_version(&self, port: u16) -> Result<String, ProbeError> {
        let mut inner = self.inner.lock();
        inner.probes.push(port);
        inner
            .version
            .clone()
            .ok_or_else(|| ProbeError::Request("connection refused".to_string()))
    }
}
