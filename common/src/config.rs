use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::AliasError;
use crate::network::{HostEntry, LoopbackAlias, Platform};

pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";
pub const DEFAULT_COMMENT: &str = "added by hostalias";

/// Everything the alias coordinator needs, passed in explicitly at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasConfig {
    /// The name that should resolve to `bind_ip` on this machine.
    pub hostname: String,
    /// The address aliased onto the loopback interface.
    pub bind_ip: IpAddr,
    /// Loopback-class interface that receives the alias.
    ///
    /// Defaults to `lo0` on BSD-style systems and `lo` on Linux.
    pub loopback_interface: String,
    /// Hosts file that is edited.
    pub hosts_file: PathBuf,
    /// Trailing comment written after the managed record.
    pub comment: String,
    /// Binary used on BSD-style systems.
    pub ifconfig_command: String,
    /// Binary used on Linux.
    pub ip_command: String,
}

impl AliasConfig {
    /// Builds a config with platform defaults from a hostname and a listen address.
    ///
    /// `bind` may be a bare IP or an `ip:port` / `[ipv6]:port` listen address.
    pub fn new(hostname: &str, bind: &str) -> Result<Self, AliasError> {
        let bind_ip = parse_bind_ip(bind)?;
        let loopback_interface = Platform::detect()
            .map(Platform::default_interface)
            .unwrap_or("lo0")
            .to_string();

        let cfg = Self {
            hostname: hostname.to_string(),
            bind_ip,
            loopback_interface,
            hosts_file: PathBuf::from(DEFAULT_HOSTS_FILE),
            comment: DEFAULT_COMMENT.to_string(),
            ifconfig_command: "ifconfig".to_string(),
            ip_command: "ip".to_string(),
        };
        cfg.host_entry()?;
        Ok(cfg)
    }

    pub fn host_entry(&self) -> Result<HostEntry, AliasError> {
        HostEntry::from_parts(&self.hostname, self.bind_ip)
    }

    pub fn loopback_alias(&self) -> LoopbackAlias {
        LoopbackAlias::new(self.bind_ip, self.loopback_interface.clone())
    }
}

/// Extracts the IP from a listen address.
pub fn parse_bind_ip(bind: &str) -> Result<IpAddr, AliasError> {
    let bind = bind.trim();
    if let Ok(addr) = bind.parse::<SocketAddr>() {
        return Ok(addr.ip());
    }
    let unbracketed = bind
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(bind);
    if let Ok(ip) = unbracketed.parse::<IpAddr>() {
        return Ok(ip);
    }
    let host = bind
        .rsplit_once(':')
        .map(|(host, _port)| host.trim_start_matches('[').trim_end_matches(']'))
        .unwrap_or(bind);
    host.parse::<IpAddr>()
        .map_err(|_| AliasError::Config(format!("bind address {bind:?} does not contain an IP address")))
}
