pub mod release;
pub mod status;
pub mod up;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hostalias_common::config::{DEFAULT_COMMENT, DEFAULT_HOSTS_FILE};
use hostalias_common::{AliasConfig, AliasError};
use hostalias_core::interface::{self, ViabilityError};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "hostalias")]
#[command(about = "Make a hostname resolve to a loopback alias for as long as this process runs.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// The hostname to add to the hosts file (resolvable to the bind address)
    #[arg(long, global = true, env = "HOSTALIAS_HOSTNAME", default_value = "go")]
    pub hostname: String,

    /// The IP (and optional port) the service binds to
    #[arg(long, global = true, env = "HOSTALIAS_BIND", default_value = "127.0.0.53:80")]
    pub bind: String,

    /// The loopback interface that receives the alias [default: lo0, or lo on Linux]
    #[arg(long, global = true, env = "HOSTALIAS_LOOPBACK_INTERFACE")]
    pub loopback_interface: Option<String>,

    /// The hosts file to edit
    #[arg(long, global = true, env = "HOSTALIAS_HOSTFILE", default_value = DEFAULT_HOSTS_FILE)]
    pub hostfile: PathBuf,

    /// Comment written after the managed hosts entry
    #[arg(long, global = true, env = "HOSTALIAS_COMMENT", default_value = DEFAULT_COMMENT)]
    pub comment: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Alias the bind IP, map the hostname, and hold until interrupted
    #[command(alias = "u")]
    Up {
        /// Tear down after this many seconds instead of waiting for a signal
        #[arg(long = "for", value_name = "SECONDS")]
        hold_secs: Option<u64>,
    },
    /// Show whether the alias, hosts entry and name resolution are in place
    #[command(alias = "s")]
    Status,
    /// Remove a hosts entry and alias left behind by a run that was killed
    #[command(alias = "r")]
    Release,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> anyhow::Result<AliasConfig> {
        let mut cfg = AliasConfig::new(&self.hostname, &self.bind).context("invalid --hostname or --bind")?;
        if let Some(interface) = &self.loopback_interface {
            cfg.loopback_interface = interface.clone();
        }
        cfg.hosts_file = self.hostfile.clone();
        cfg.comment = self.comment.clone();
        Ok(cfg)
    }
}

pub fn hold_duration(hold_secs: Option<u64>) -> Option<Duration> {
    hold_secs.map(Duration::from_secs)
}

/// Warns about conditions that will make the privileged steps fail.
pub fn preflight(cfg: &AliasConfig) {
    if !is_root::is_root() {
        warn!("Not running as root; editing {} will probably fail", cfg.hosts_file.display());
    }
    match interface::check_loopback(&cfg.loopback_interface) {
        Ok(iface) => debug!("Using loopback interface {}", iface.name),
        Err(ViabilityError::NotFound) => warn!("Interface {} does not exist", cfg.loopback_interface),
        Err(ViabilityError::IsDown) => warn!("Interface {} is down", cfg.loopback_interface),
        Err(ViabilityError::NotLoopback) => {
            warn!("Interface {} is not a loopback interface", cfg.loopback_interface)
        }
    }
}

pub fn with_root_hint(err: AliasError) -> anyhow::Error {
    if err.is_permission_denied() || !is_root::is_root() {
        anyhow::anyhow!("{err}\n\nHint: are you root? Try again with sudo.")
    } else {
        anyhow::Error::new(err)
    }
}
