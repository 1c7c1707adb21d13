use hostalias_common::AliasError;
use hostalias_common::network::LoopbackAlias;
use tracing::info;

use super::LoopbackControl;
use crate::command::CommandLine;

/// `ip addr replace <ip> dev <iface>` / `ip addr delete <ip> dev <iface>`.
///
/// `replace` makes adding idempotent when the address is already bound.
#[derive(Debug)]
pub struct LinuxLoopback {
    alias: LoopbackAlias,
    ip: String,
}

impl LinuxLoopback {
    pub fn new(alias: LoopbackAlias, ip: &str) -> Self {
        Self {
            alias,
            ip: ip.to_string(),
        }
    }

    pub fn add_command(&self) -> CommandLine {
        self.command("replace")
    }

    pub fn remove_command(&self) -> CommandLine {
        self.command("delete")
    }

    fn command(&self, verb: &str) -> CommandLine {
        CommandLine::new(
            &self.ip,
            [
                "addr".to_string(),
                verb.to_string(),
                self.alias.ip.to_string(),
                "dev".to_string(),
                self.alias.interface.clone(),
            ],
        )
    }
}

impl LoopbackControl for LinuxLoopback {
    fn add(&self) -> Result<(), AliasError> {
        info!("Setting up loopback IP {}", self.alias);
        self.add_command().run()
    }

    fn remove(&self) -> Result<(), AliasError> {
        info!("Removing loopback IP {}", self.alias);
        self.remove_command().run()
    }

    fn alias(&self) -> &LoopbackAlias {
        &self.alias
    }
}
