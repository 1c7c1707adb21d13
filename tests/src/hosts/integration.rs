#![cfg(test)]
use hostalias_common::AliasError;
use hostalias_common::network::HostEntry;
use hostalias_core::HostsStore;

use crate::fixtures::{MACOS_HOSTS, TempHosts};

fn entry(host: &str, ip: &str) -> HostEntry {
    HostEntry::new(host, ip).unwrap()
}

fn unrelated_lines() -> Vec<&'static str> {
    MACOS_HOSTS.lines().collect()
}

/// Asserts `needles` occur in `haystack` unmodified and in the same relative order.
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let lines: Vec<&str> = haystack.lines().collect();
    let mut cursor = 0;
    for needle in needles {
        let pos = lines[cursor..]
            .iter()
            .position(|line| line == needle)
            .unwrap_or_else(|| panic!("missing or reordered line {needle:?} in:\n{haystack}"));
        cursor += pos + 1;
    }
}

#[test]
fn remove_twice_reports_true_then_false() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let file = hosts.file();
    let e = entry("go", "127.0.0.53");
    file.add_entry(&e, "added by hostalias").unwrap();

    assert!(file.remove_entry(&e).unwrap());
    let after_first = hosts.content();
    assert!(!file.remove_entry(&e).unwrap());
    assert_eq!(hosts.content(), after_first);
}

#[test]
fn add_then_remove_round_trips() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let file = hosts.file();
    let e = entry("go", "127.0.0.53");

    file.add_entry(&e, "c").unwrap();
    assert!(hosts.content().contains("127.0.0.53 go # c"));
    file.remove_entry(&e).unwrap();

    assert_eq!(hosts.content(), MACOS_HOSTS);
}

#[test]
fn round_trip_without_trailing_newline_differs_at_most_by_newline() {
    let original = MACOS_HOSTS.trim_end_matches('\n');
    let hosts = TempHosts::with_content(original);
    let file = hosts.file();
    let e = entry("go", "127.0.0.53");

    file.add_entry(&e, "c").unwrap();
    file.remove_entry(&e).unwrap();

    let content = hosts.content();
    assert_eq!(content.trim_end_matches('\n'), original);
    assert!(content.len() <= original.len() + 1);
}

#[test]
fn unrelated_lines_survive_a_sequence_of_edits() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let file = hosts.file();
    let go = entry("go", "127.0.0.53");
    let wiki = entry("wiki", "127.0.0.54");

    file.add_entry(&go, "one").unwrap();
    file.add_entry(&wiki, "two").unwrap();
    assert_in_order(&hosts.content(), &unrelated_lines());

    file.remove_entry(&go).unwrap();
    assert_in_order(&hosts.content(), &unrelated_lines());
    assert!(hosts.content().contains("127.0.0.54 wiki # two"));

    file.remove_entry(&wiki).unwrap();
    file.remove_entry(&wiki).unwrap();
    assert_in_order(&hosts.content(), &unrelated_lines());
    assert_eq!(hosts.content(), MACOS_HOSTS);
}

#[test]
fn duplicate_ip_is_refused_without_touching_the_file() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let err = hosts.file().add_entry(&entry("mine", "10.0.0.5"), "c").unwrap_err();
    assert!(matches!(err, AliasError::AlreadyPresent { .. }));
    assert_eq!(hosts.content(), MACOS_HOSTS);
}

#[test]
fn colliding_ip_with_other_hostname_is_never_removed() {
    let hosts = TempHosts::with_content(MACOS_HOSTS);
    let removed = hosts.file().remove_entry(&entry("my-host", "10.0.0.5")).unwrap();
    assert!(!removed);
    assert!(hosts.content().contains("10.0.0.5 other-host # unrelated"));
    assert_eq!(hosts.content(), MACOS_HOSTS);
}

#[test]
fn multi_host_lines_are_left_alone() {
    let content = "127.0.0.53 go go.local # shared\n";
    let hosts = TempHosts::with_content(content);
    assert!(!hosts.file().remove_entry(&entry("go", "127.0.0.53")).unwrap());
    assert_eq!(hosts.content(), content);
}

#[test]
fn exists_counts_ip_mentioned_only_in_a_comment() {
    let hosts = TempHosts::with_content("# reserved 127.0.0.53 for later\n");
    assert!(hosts.file().exists("127.0.0.53".parse().unwrap()).unwrap());
}

#[test]
fn removes_every_exact_duplicate_record() {
    let content = "127.0.0.1 localhost\n127.0.0.53 go\n# keep me\n127.0.0.53 go # again\n";
    let hosts = TempHosts::with_content(content);
    assert!(hosts.file().remove_entry(&entry("go", "127.0.0.53")).unwrap());
    assert_eq!(hosts.content(), "127.0.0.1 localhost\n# keep me\n");
}
