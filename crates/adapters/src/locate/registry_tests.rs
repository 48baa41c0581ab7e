// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const QUERY_OUTPUT: &str = "\r\nHKEY_CURRENT_USER\\SOFTWARE\\AceStream\r\n    EnginePath    REG_SZ    C:\\Users\\me\\AppData\\Roaming\\ACEStream\\engine\\ace_engine.exe\r\n\r\n";

#[test]
fn parses_engine_path() {
    assert_eq!(
        parse_reg_query(QUERY_OUTPUT, "EnginePath"),
        Some(PathBuf::from(
            r"C:\Users\me\AppData\Roaming\ACEStream\engine\ace_engine.exe"
        ))
    );
}

#[test]
fn keeps_spaces_inside_value() {
    let output = "    EnginePath    REG_EXPAND_SZ    C:\\Program Files\\Ace Stream\\ace_engine.exe\n";
    assert_eq!(
        parse_reg_query(output, "EnginePath"),
        Some(PathBuf::from(r"C:\Program Files\Ace Stream\ace_engine.exe"))
    );
}

#[yare::parameterized(
    empty          = { "" },
    other_value    = { "    InstallDir    REG_SZ    C:\\Ace\n" },
    longer_name    = { "    EnginePathOld    REG_SZ    C:\\Ace\\old.exe\n" },
    missing_value  = { "    EnginePath    REG_SZ    \n" },
    not_a_reg_type = { "    EnginePath    is not set\n" },
)]
fn rejects(output: &str) {
    assert_eq!(parse_reg_query(output, "EnginePath"), None);
}

#[test]
fn default_resolver_targets_engine_key() {
    let resolver = RegistryPathResolver::default();
    assert_eq!(resolver.key, ENGINE_REGISTRY_KEY);
    assert_eq!(resolver.value, ENGINE_REGISTRY_VALUE);
}

#[test]
fn keeps_non_ascii_user_directory() {
    let output = "    EnginePath    REG_SZ    C:\\Users\\Пользователь\\AppData\\Roaming\\ACEStream\\engine\\ace_engine.exe\r\n";
    let stdout = decode_reg_output(output.as_bytes().to_vec()).unwrap();
    assert_eq!(
        parse_reg_query(&stdout, "EnginePath"),
        Some(PathBuf::from(
            r"C:\Users\Пользователь\AppData\Roaming\ACEStream\engine\ace_engine.exe"
        ))
    );
}

#[test]
fn oem_encoded_output_is_an_error_not_a_mangled_path() {
    // "Пол" in code page 866
    let mut stdout = b"    EnginePath    REG_SZ    C:\\Users\\".to_vec();
    stdout.extend_from_slice(&[0x8F, 0xAE, 0xAB]);
    stdout.extend_from_slice(b"\\ace_engine.exe\r\n");

    let err = decode_reg_output(stdout).unwrap_err();
    assert!(err.to_string().contains("not UTF-8"), "{err}");
}

#[yare::parameterized(
    short_user   = { r"HKCU\SOFTWARE\AceStream", RegistryHive::CurrentUser, r"SOFTWARE\AceStream" },
    long_user    = { r"HKEY_CURRENT_USER\SOFTWARE\AceStream", RegistryHive::CurrentUser, r"SOFTWARE\AceStream" },
    machine      = { r"HKLM\SOFTWARE\AceStream", RegistryHive::LocalMachine, r"SOFTWARE\AceStream" },
    lowercase    = { r"hkcu\Software", RegistryHive::CurrentUser, "Software" },
)]
fn splits_hive(key: &str, hive: RegistryHive, subkey: &str) {
    assert_eq!(split_hive(key), Some((hive, subkey)));
}

#[yare::parameterized(
    no_subkey    = { "HKCU" },
    empty_subkey = { r"HKCU\" },
    unknown_hive = { r"HKCR\SOFTWARE\AceStream" },
)]
fn rejects_key(key: &str) {
    assert_eq!(split_hive(key), None);
}
