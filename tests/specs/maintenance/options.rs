//! Options specs: configuration loaded from TOML.

use crate::prelude::*;

#[test]
fn toml_options_drive_the_supervisor() {
    let options = ConnectorOptions::from_toml_str(
        r#"
checkForPatch = false
httpPort = 6999
autoInstall = true

[autoStart]
onConnect = true
onSuspend = false
"#,
    )
    .unwrap();

    let h = Harness::with_options(options);
    let options = h.supervisor.options();
    assert_eq!(options.http_port, 6999);
    assert!(!options.check_for_patch);
    assert!(options.auto_install);
    assert!(options.start_on_connect());
    assert!(!options.restart_on_suspend());
}

#[tokio::test]
async fn configured_port_is_probed() {
    let h = Harness::with_options(ConnectorOptions::from_toml_str("httpPort = 6999").unwrap());
    h.engine_answers("3.1.32");

    assert!(h.supervisor.check_http_connection().await);
    assert_eq!(h.probe.probes(), vec![6999]);
}

#[test]
fn missing_options_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let options = ConnectorOptions::load(&dir.path().join("ace.toml")).unwrap();
    assert_eq!(options, ConnectorOptions::default());
    assert_eq!(options.http_port, 6878);
}
