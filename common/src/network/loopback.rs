//! # Loopback Alias Model
//!
//! Describes which extra IP should be bound to which loopback-class interface,
//! and which platform family decides how that is done.

use std::fmt;
use std::net::IpAddr;

use crate::error::AliasError;

/// Platform families with a known alias command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// `ifconfig <iface> alias|delete <ip>` (macOS and the BSDs).
    Bsd,
    /// `ip addr replace|delete <ip> dev <iface>`.
    Linux,
}

impl Platform {
    /// Picks the platform family of the running OS.
    pub fn detect() -> Result<Self, AliasError> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Result<Self, AliasError> {
        match os {
            "macos" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Ok(Platform::Bsd),
            "linux" => Ok(Platform::Linux),
            other => Err(AliasError::PlatformUnsupported(other.to_string())),
        }
    }

    /// The loopback device aliases go on when nothing else is configured.
    pub fn default_interface(self) -> &'static str {
        match self {
            Platform::Bsd => "lo0",
            Platform::Linux => "lo",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Bsd => write!(f, "bsd"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

/// A single IP alias on a named interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopbackAlias {
    pub ip: IpAddr,
    pub interface: String,
}

impl LoopbackAlias {
    pub fn new(ip: IpAddr, interface: impl Into<String>) -> Self {
        Self {
            ip,
            interface: interface.into(),
        }
    }
}

impl fmt::Display for LoopbackAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.ip, self.interface)
    }
}
