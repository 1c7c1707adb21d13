#![cfg(test)]
use std::sync::Arc;

use hostalias_common::AliasError;
use hostalias_common::network::HostEntry;
use hostalias_core::{AliasCoordinator, AliasSession, HostsStore, LoopbackControl, SessionState};

use crate::fixtures::{FlakyHosts, MACOS_HOSTS, RecordingLoopback, TempHosts};

const COMMENT: &str = "added by hostalias";

fn go() -> HostEntry {
    HostEntry::new("go", "127.0.0.53").unwrap()
}

fn coordinator(loopback: &Arc<RecordingLoopback>, hosts: Arc<dyn HostsStore>) -> AliasCoordinator {
    let loopback: Arc<dyn LoopbackControl> = loopback.clone();
    AliasCoordinator::with_parts(go(), COMMENT, loopback, hosts)
}

#[test]
fn start_adds_alias_and_entry_and_teardown_reverts_both() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let loopback = Arc::new(RecordingLoopback::new(go().ip()));
    let coord = coordinator(&loopback, Arc::new(hosts.file()));

    let session = coord.start().unwrap();
    assert_eq!(session.state(), SessionState::Active { hosts_entry: true });
    assert!(hosts.content().contains("127.0.0.53 go # added by hostalias"));
    assert_eq!(loopback.calls.adds(), 1);

    session.teardown().unwrap();
    assert_eq!(hosts.content(), MACOS_HOSTS);
    assert_eq!(loopback.calls.removes(), 1);
    assert_eq!(session.state(), SessionState::TornDown);
}

#[test]
fn failing_add_entry_still_rolls_back_alias() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let flaky = FlakyHosts::new(hosts.file());
    flaky.set_fail_add(true);
    let loopback = Arc::new(RecordingLoopback::new(go().ip()));
    let coord = coordinator(&loopback, Arc::new(flaky));

    let err = coord.start().unwrap_err();
    assert!(matches!(err.error, AliasError::FileIo { .. }));
    assert_eq!(err.session.state(), SessionState::AliasAddedHostsFailed);
    assert_eq!(loopback.calls.removes(), 0);

    err.session.teardown().unwrap();
    assert_eq!(loopback.calls.removes(), 1);
    assert_eq!(hosts.content(), MACOS_HOSTS);
}

#[test]
fn failing_exists_check_still_rolls_back_alias() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let flaky = FlakyHosts::new(hosts.file());
    flaky.set_fail_exists(true);
    let loopback = Arc::new(RecordingLoopback::new(go().ip()));
    let coord = coordinator(&loopback, Arc::new(flaky));

    let err = coord.start().unwrap_err();
    err.session.teardown().unwrap();
    assert_eq!(loopback.calls.removes(), 1);
}

#[test]
fn failing_alias_leaves_nothing_to_undo() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let loopback = Arc::new(RecordingLoopback::new(go().ip()).failing_add());
    let coord = coordinator(&loopback, Arc::new(hosts.file()));

    let err = coord.start().unwrap_err();
    assert!(matches!(err.error, AliasError::Exec { .. }));
    err.session.teardown().unwrap();

    assert_eq!(loopback.calls.removes(), 0);
    assert_eq!(hosts.content(), MACOS_HOSTS);
}

#[test]
fn already_mapped_ip_is_not_duplicated_or_removed() {
    let content = "127.0.0.1 localhost\n127.0.0.53 go.corp\n";
    let hosts = TempHosts::with_content(content);
    let loopback = Arc::new(RecordingLoopback::new(go().ip()));
    let coord = coordinator(&loopback, Arc::new(hosts.file()));

    let session = coord.start().unwrap();
    assert!(!session.hosts_entry_applied());
    assert_eq!(hosts.content(), content);

    session.teardown().unwrap();
    assert_eq!(hosts.content(), content);
    assert_eq!(loopback.calls.removes(), 1);
}

#[test]
fn teardown_twice_matches_teardown_once() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let loopback = Arc::new(RecordingLoopback::new(go().ip()));
    let coord = coordinator(&loopback, Arc::new(hosts.file()));

    let session = coord.start().unwrap();
    session.teardown().unwrap();
    let once = hosts.content();

    let again: AliasSession = session.clone();
    again.teardown().unwrap();
    assert_eq!(hosts.content(), once);
    assert_eq!(loopback.calls.removes(), 1);
}

#[test]
fn hosts_failure_during_teardown_does_not_skip_alias_removal() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let flaky = Arc::new(FlakyHosts::new(hosts.file()));
    let loopback = Arc::new(RecordingLoopback::new(go().ip()).failing_remove());
    let coord = coordinator(&loopback, flaky.clone());
    let session = coord.start().unwrap();

    // Removing the hosts entry behind the session's back makes its own removal a no-op,
    // so the only failure left is the alias.
    flaky.inner.remove_entry(&go()).unwrap();
    match session.teardown() {
        Err(AliasError::Teardown(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0], AliasError::Exec { .. }));
        }
        other => panic!("expected teardown error, got {other:?}"),
    }
    assert_eq!(loopback.calls.removes(), 1);
}

#[test]
fn both_teardown_failures_are_reported() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let flaky = Arc::new(FlakyHosts::new(hosts.file()));
    let loopback = Arc::new(RecordingLoopback::new(go().ip()).failing_remove());
    let session = coordinator(&loopback, flaky.clone()).start().unwrap();
    flaky.set_fail_remove(true);

    match session.teardown() {
        Err(AliasError::Teardown(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected two teardown errors, got {other:?}"),
    }
    assert_eq!(loopback.calls.removes(), 1);
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn configured_platform_tools_drive_a_real_round_trip() {
    use hostalias_common::AliasConfig;

    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let mut cfg = AliasConfig::new("go", "127.0.0.53:80").unwrap();
    cfg.hosts_file = hosts.path.clone();
    cfg.ip_command = "true".to_string();
    cfg.ifconfig_command = "true".to_string();

    let coord = AliasCoordinator::new(&cfg).unwrap();
    let session = coord.start().unwrap();
    assert!(session.hosts_entry_applied());

    (session.into_teardown_fn())().unwrap();
    assert_eq!(hosts.content(), MACOS_HOSTS);
}
