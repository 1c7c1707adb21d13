//! The platform **abstraction** for loopback aliases.
//!
//! Exactly one [`LoopbackControl`] variant is active per process. It is chosen once
//! from the running OS by [`for_platform`]; platforms without a known alias tool are
//! rejected at construction rather than silently ignored.
//!
//! Both variants shell out synchronously and never retry. Retry policy belongs to
//! the caller.

use std::sync::Arc;

use hostalias_common::network::{LoopbackAlias, Platform};
use hostalias_common::{AliasConfig, AliasError};

mod bsd;
mod linux;

pub use bsd::BsdLoopback;
pub use linux::LinuxLoopback;

/// Adds and removes a single IP alias on a loopback-class interface.
pub trait LoopbackControl: Send + Sync {
    fn add(&self) -> Result<(), AliasError>;
    fn remove(&self) -> Result<(), AliasError>;
    fn alias(&self) -> &LoopbackAlias;
}

/// Builds the controller for the running OS.
pub fn from_config(cfg: &AliasConfig) -> Result<Arc<dyn LoopbackControl>, AliasError> {
    for_platform(Platform::detect()?, cfg)
}

pub fn for_platform(platform: Platform, cfg: &AliasConfig) -> Result<Arc<dyn LoopbackControl>, AliasError> {
    let alias = cfg.loopback_alias();
    if alias.interface.trim().is_empty() {
        return Err(AliasError::Config("loopback interface name is empty".to_string()));
    }
    Ok(match platform {
        Platform::Bsd => Arc::new(BsdLoopback::new(alias, &cfg.ifconfig_command)),
        Platform::Linux => Arc::new(LinuxLoopback::new(alias, &cfg.ip_command)),
    })
}
