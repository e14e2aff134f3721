use log::info;

use crate::error::RedirectError;
use crate::filter::udp_dst_port_filter;
use crate::interface;
use crate::receive::receive_frame;
use crate::rewrite::rewrite_frame;
use crate::rule::{Mode, TranslationRule};
use crate::send::{send_raw, send_udp};
use crate::sockets::{create_udp_socket, RawSocket};

/// Drives one frame through the whole pipeline: build the classifier,
/// open the filtered capture socket, capture, rewrite, send. Sockets and
/// the frame buffer are released on every exit path, success or failure.
///
/// A long-running service is expected to call this in a loop; retry and
/// backoff are deliberately left to the caller.
pub fn run(rule: &TranslationRule) -> Result<(), RedirectError> {
    let program = udp_dst_port_filter(rule.listen_port);
    info!("filtering packets for udp dst port {}", rule.listen_port);

    let socket = RawSocket::open_filtered(&program)?;

    match rule.mode {
        Mode::Raw => {
            // Resolve before blocking on the capture: a bad source
            // address should fail fast, not after the timeout.
            let binding = interface::resolve(rule.source_address)?;
            info!("sending packets on interface {}", binding.name);

            let frame = receive_frame(&socket)?;
            let rewritten = rewrite_frame(frame, rule)?;
            send_raw(&socket, rewritten.link_frame(), &binding)?;
        }
        Mode::Udp => {
            let udp_socket = create_udp_socket()?;

            let frame = receive_frame(&socket)?;
            let rewritten = rewrite_frame(frame, rule)?;
            send_udp(&udp_socket, rewritten.payload(), rule.forward_socket_addr())?;
        }
    }

    info!(
        "redirected {}:{} --> {}:{}",
        rule.source_address, rule.listen_port, rule.forward_address, rule.forward_port
    );

    Ok(())
}
