use hostalias_common::AliasConfig;
use hostalias_core::hosts::{self, HostsFile};
use hostalias_core::{AliasCoordinator, interface};
use tracing::warn;

use crate::terminal::print;

const KEY_WIDTH: usize = 14;

pub fn status(cfg: &AliasConfig) -> anyhow::Result<()> {
    let entry = cfg.host_entry()?;
    let alias = cfg.loopback_alias();

    print::header("status");
    print::aligned_line("hostname", KEY_WIDTH, entry.host());
    print::aligned_line("address", KEY_WIDTH, entry.ip());
    print::aligned_line("interface", KEY_WIDTH, &alias.interface);
    print::aligned_line("alias bound", KEY_WIDTH, print::yes_no(interface::alias_present(&alias)));

    let hosts_file = HostsFile::new(cfg.hosts_file.clone());
    match hosts_file.read() {
        Ok(content) => {
            let managed = hosts::lines(&content).any(|line| hosts::is_entry_line(line, &entry));
            print::aligned_line("ip in hosts", KEY_WIDTH, print::yes_no(hosts::contains_ip(&content, entry.ip())));
            print::aligned_line("entry in hosts", KEY_WIDTH, print::yes_no(managed));
        }
        Err(err) => warn!("{err}"),
    }

    match AliasCoordinator::new(cfg) {
        Ok(coordinator) => {
            let resolves = coordinator.exists().unwrap_or(false);
            print::aligned_line("resolves", KEY_WIDTH, print::yes_no(resolves));
        }
        Err(err) => warn!("{err}"),
    }
    print::fat_separator();
    Ok(())
}
