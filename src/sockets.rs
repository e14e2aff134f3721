use std::io;
use std::mem;
use std::net::UdpSocket;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use crate::error::RedirectError;
use crate::filter::{FilterOp, FILTER_LEN};

/// Receive timeout on the capture socket, in seconds.
const RECV_TIMEOUT_SECS: libc::time_t = 10;

/// An `AF_PACKET/SOCK_RAW` socket over `ETH_P_ALL` with a classic-BPF
/// program attached, used both to capture matching frames and to re-emit
/// rewritten ones. The descriptor is closed on drop, so every early
/// return after creation releases it.
pub struct RawSocket {
    fd: OwnedFd,
}

impl RawSocket {
    /// Opens the capture socket, attaches `program` as its socket filter
    /// and arms the fixed receive timeout. Any failure after `socket(2)`
    /// succeeds closes the half-configured descriptor before returning.
    pub fn open_filtered(program: &[FilterOp; FILTER_LEN]) -> Result<Self, RedirectError> {
        let raw_fd = unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW,
                i32::from((libc::ETH_P_ALL as u16).to_be()),
            )
        };
        if raw_fd < 0 {
            return Err(socket_err("raw socket creation"));
        }
        let fd = unsafe { OwnedFd::from_raw_fd(raw_fd) };

        let fprog = libc::sock_fprog {
            len: FILTER_LEN as u16,
            filter: program.as_ptr() as *mut libc::sock_filter,
        };
        setsockopt(&fd, libc::SO_ATTACH_FILTER, &fprog, "filter attach")?;

        let timeout = libc::timeval {
            tv_sec: RECV_TIMEOUT_SECS,
            tv_usec: 0,
        };
        setsockopt(&fd, libc::SO_RCVTIMEO, &timeout, "receive timeout setup")?;

        Ok(Self { fd })
    }

    /// Blocking receive of one frame, bounded by the socket timeout.
    pub fn recv(&self, buf: &mut [u8]) -> Result<usize, RedirectError> {
        let received = unsafe {
            libc::recv(
                self.fd.as_raw_fd(),
                buf.as_mut_ptr().cast(),
                buf.len(),
                0,
            )
        };
        if received < 0 {
            return Err(socket_err("receive"));
        }
        Ok(received as usize)
    }

    /// Sends a full link-layer frame out of the interface with the given
    /// index, addressed at `ETH_P_ALL` like the capture side.
    pub fn send_to_interface(&self, frame: &[u8], if_index: u32) -> Result<(), RedirectError> {
        let mut device: libc::sockaddr_ll = unsafe { mem::zeroed() };
        device.sll_family = libc::AF_PACKET as u16;
        device.sll_protocol = (libc::ETH_P_ALL as u16).to_be();
        device.sll_ifindex = if_index as i32;

        let sent = unsafe {
            libc::sendto(
                self.fd.as_raw_fd(),
                frame.as_ptr().cast(),
                frame.len(),
                0,
                std::ptr::addr_of!(device).cast(),
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if sent < 0 {
            return Err(socket_err("raw send"));
        }
        Ok(())
    }
}

/// Opens the plain `AF_INET/SOCK_DGRAM` socket used by the non-raw send
/// path; the kernel picks the local port.
pub fn create_udp_socket() -> Result<UdpSocket, RedirectError> {
    UdpSocket::bind("0.0.0.0:0").map_err(|source| RedirectError::Socket {
        op: "udp socket creation",
        source,
    })
}

fn setsockopt<T>(
    fd: &OwnedFd,
    option: libc::c_int,
    value: &T,
    op: &'static str,
) -> Result<(), RedirectError> {
    let rc = unsafe {
        libc::setsockopt(
            fd.as_raw_fd(),
            libc::SOL_SOCKET,
            option,
            std::ptr::from_ref(value).cast(),
            mem::size_of::<T>() as libc::socklen_t,
        )
    };
    if rc < 0 {
        return Err(socket_err(op));
    }
    Ok(())
}

fn socket_err(op: &'static str) -> RedirectError {
    RedirectError::Socket {
        op,
        source: io::Error::last_os_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::create_udp_socket;

    #[test]
    fn test_create_udp_socket_binds_ephemeral_port() {
        let socket = create_udp_socket().unwrap();
        assert_ne!(socket.local_addr().unwrap().port(), 0);
    }
}
