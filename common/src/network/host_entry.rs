//! # Hosts File Entry Model
//!
//! A [`HostEntry`] is one desired `ip hostname` mapping. It is validated once at
//! construction and never changes afterwards.

use std::fmt;
use std::net::IpAddr;

use crate::error::AliasError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostEntry {
    host: String,
    ip: IpAddr,
}

impl HostEntry {
    /// Builds an entry from a hostname and the textual form of an IP address.
    pub fn new(host: &str, ip: &str) -> Result<Self, AliasError> {
        let ip: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| AliasError::Config(format!("invalid IP address {ip:?}")))?;
        Self::from_parts(host, ip)
    }

    pub fn from_parts(host: &str, ip: IpAddr) -> Result<Self, AliasError> {
        validate_hostname(host)?;
        Ok(Self {
            host: host.to_string(),
            ip,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// The record as it is written into a hosts file.
    pub fn to_line(&self, comment: &str) -> String {
        if comment.is_empty() {
            format!("{} {}", self.ip, self.host)
        } else {
            format!("{} {} # {}", self.ip, self.host, comment)
        }
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ip, self.host)
    }
}

/// A hostname must fit in a single hosts-file field.
fn validate_hostname(host: &str) -> Result<(), AliasError> {
    if host.is_empty() {
        return Err(AliasError::Config("hostname is empty".to_string()));
    }
    if host.chars().any(|c| c.is_whitespace() || c == '#') {
        return Err(AliasError::Config(format!("invalid hostname {host:?}")));
    }
    Ok(())
}
