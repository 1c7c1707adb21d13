use hostalias_common::AliasError;
use hostalias_common::network::LoopbackAlias;
use tracing::info;

use super::LoopbackControl;
use crate::command::CommandLine;

/// `ifconfig <iface> alias <ip>` / `ifconfig <iface> delete <ip>`.
#[derive(Debug)]
pub struct BsdLoopback {
    alias: LoopbackAlias,
    ifconfig: String,
}

impl BsdLoopback {
    pub fn new(alias: LoopbackAlias, ifconfig: &str) -> Self {
        Self {
            alias,
            ifconfig: ifconfig.to_string(),
        }
    }

    pub fn add_command(&self) -> CommandLine {
        self.command("alias")
    }

    pub fn remove_command(&self) -> CommandLine {
        self.command("delete")
    }

    fn command(&self, verb: &str) -> CommandLine {
        CommandLine::new(
            &self.ifconfig,
            [self.alias.interface.clone(), verb.to_string(), self.alias.ip.to_string()],
        )
    }
}

impl LoopbackControl for BsdLoopback {
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
