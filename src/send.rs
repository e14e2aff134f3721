use std::net::{SocketAddrV4, UdpSocket};

use log::debug;

use crate::error::RedirectError;
use crate::interface::InterfaceBinding;
use crate::sockets::RawSocket;

/// Re-emits the rewritten link-layer frame on the interface resolved from
/// the rule's source address.
pub fn send_raw(
    socket: &RawSocket,
    frame: &[u8],
    interface: &InterfaceBinding,
) -> Result<(), RedirectError> {
    if frame.is_empty() {
        return Err(RedirectError::InvalidInput("empty frame to send"));
    }
    debug!(
        "sending {} bytes on interface {} (index {})",
        frame.len(),
        interface.name,
        interface.index
    );
    socket.send_to_interface(frame, interface.index)
}

/// Sends the rewritten payload as a fresh datagram through the
/// kernel-managed UDP socket.
pub fn send_udp(socket: &UdpSocket, payload: &[u8], dest: SocketAddrV4) -> Result<(), RedirectError> {
    if payload.is_empty() {
        return Err(RedirectError::InvalidInput("empty payload to send"));
    }
    debug!("sending {} bytes to {dest}", payload.len());
    socket
        .send_to(payload, dest)
        .map_err(|source| RedirectError::Socket {
            op: "udp send",
            source,
        })?;
    Ok(())
}
