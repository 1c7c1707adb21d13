use std::net::IpAddr;

use hostalias_common::network::LoopbackAlias;
use pnet::datalink::{self, NetworkInterface};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// No interface with that name exists.
    NotFound,
    /// The interface is operationally down.
    IsDown,
    /// The interface does not carry the loopback flag.
    NotLoopback,
}

pub fn find_interface(name: &str) -> Option<NetworkInterface> {
    find_in(&datalink::interfaces(), name)
}

/// Looks up `name` and checks it can carry a loopback alias.
pub fn check_loopback(name: &str) -> Result<NetworkInterface, ViabilityError> {
    let interface = find_interface(name).ok_or(ViabilityError::NotFound)?;
    is_viable_loopback_interface(&interface)?;
    Ok(interface)
}

/// Whether the alias is currently bound according to the kernel's interface table.
pub fn alias_present(alias: &LoopbackAlias) -> bool {
    find_interface(&alias.interface)
        .map(|interface| has_alias(&interface, alias.ip))
        .unwrap_or(false)
}

pub fn has_alias(interface: &NetworkInterface, ip: IpAddr) -> bool {
    interface.ips.iter().any(|net| net.ip() == ip)
}

fn find_in(interfaces: &[NetworkInterface], name: &str) -> Option<NetworkInterface> {
    interfaces.iter().find(|interface| interface.name == name).cloned()
}

fn is_viable_loopback_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if !interface.is_loopback() {
        return Err(ViabilityError::NotLoopback);
    }
    Ok(())
}
