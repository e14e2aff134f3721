use std::net::{IpAddr, Ipv4Addr};

use network_interface::{NetworkInterface, NetworkInterfaceConfig};

use crate::error::RedirectError;

/// The network interface owning the configured source address, resolved
/// once per run and used only by the raw send path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceBinding {
    pub name: String,
    pub index: u32,
}

/// Maps a local IPv4 address to the interface that owns it.
///
/// Returns [`RedirectError::Resolution`] when no interface carries the
/// address, and [`RedirectError::InterfaceList`] when the host's
/// interface table cannot be read at all.
pub fn resolve(address: Ipv4Addr) -> Result<InterfaceBinding, RedirectError> {
    let interfaces = NetworkInterface::show()
        .map_err(|e| RedirectError::InterfaceList(e.to_string()))?;

    interfaces
        .into_iter()
        .find(|interface| {
            interface
                .addr
                .iter()
                .any(|addr| addr.ip() == IpAddr::V4(address))
        })
        .map(|interface| InterfaceBinding {
            name: interface.name,
            index: interface.index,
        })
        .ok_or(RedirectError::Resolution(address))
}
