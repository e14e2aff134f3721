use log::debug;

use crate::error::RedirectError;
use crate::sockets::RawSocket;

/// Largest possible captured frame; receive buffers start at this size.
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize;

/// Captures one frame from the filtered socket.
///
/// The attached BPF program already restricts which frames reach user
/// space, and partial reads interact unreliably with datagram-oriented
/// raw capture, so this is deliberately a single maximum-size receive
/// rather than a "read header, then read body" protocol. The buffer is
/// then right-sized to the byte count actually received; keeping the
/// oversized allocation would be harmless, so shrinking is best-effort.
pub fn receive_frame(socket: &RawSocket) -> Result<Vec<u8>, RedirectError> {
    let mut frame = vec![0; MAX_FRAME_SIZE];
    let received = socket.recv(&mut frame)?;
    frame.truncate(received);
    frame.shrink_to_fit();
    debug!("captured frame of {received} bytes");
    Ok(frame)
}
