// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn probe_timeout_defaults_to_five_seconds() {
    std::env::remove_var("ACE_PROBE_TIMEOUT_MS");
    assert_eq!(probe_timeout(), Duration::from_secs(5));
}

#[test]
#[serial]
fn probe_timeout_reads_env() {
    std::env::set_var("ACE_PROBE_TIMEOUT_MS", "250");
    assert_eq!(probe_timeout(), Duration::from_millis(250));
    std::env::remove_var("ACE_PROBE_TIMEOUT_MS");
}

#[test]
#[serial]
fn unparsable_value_falls_back_to_default() {
    std::env::set_var("ACE_REG_TIMEOUT_MS", "soon");
    assert_eq!(registry_timeout(), Duration::from_secs(10));
    std::env::remove_var("ACE_REG_TIMEOUT_MS");
}

#[test]
#[serial]
fn download_inactivity_default() {
    std::env::remove_var("ACE_DOWNLOAD_INACTIVITY_MS");
    assert_eq!(download_inactivity_timeout(), Duration::from_secs(300));
}
