// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the engine's external I/O: registry, processes, HTTP,
//! filesystem watching and process launching.

pub mod checksum;
mod env;
pub mod launch;
pub mod locate;
pub mod probe;
pub mod process;
pub mod subprocess;
pub mod traced;
pub mod transfer;
pub mod watch;

pub use checksum::md5_file;
pub use launch::{CommandLauncher, LaunchAdapter, LaunchError};
pub use locate::{PathResolver, RegistryPathResolver, ResolveError};
pub use probe::{HealthProbe, HttpHealthProbe, ProbeError};
pub use process::{ProcessAdapter, ProcessError, ProcessInfo, SystemProcessAdapter};
pub use traced::{TracedLauncher, TracedProcesses};
pub use transfer::{HttpTransfer, ProgressFn, TransferAdapter, TransferError};
pub use watch::{NotifyPortWatcher, PortFileEvent, PortWatchAdapter, WatchError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use launch::{FakeLauncher, LaunchCall};
#[cfg(any(test, feature = "test-support"))]
pub use locate::FakePathResolver;
#[cfg(any(test, feature = "test-support"))]
pub use probe::FakeHealthProbe;
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessAdapter, ProcessCall};
#[cfg(any(test, feature = "test-support"))]
pub use transfer::{FakeTransfer, TransferCall};
#[cfg(any(test, feature = "test-support"))]
pub use watch::{FakePortWatcher, FakeWatchGuard};
