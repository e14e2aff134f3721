use std::net::Ipv4Addr;

use log::debug;

use crate::craft::checksums::{ipv4_checksum, udp_checksum};
use crate::craft::hex_dump;
use crate::error::{ParseError, RedirectError};
use crate::rule::TranslationRule;

/// Fixed size of an Ethernet header.
pub const ETHERNET_HEADER_SIZE: usize = 14;
/// Smallest valid IPv4 header (IHL of 5 words, no options).
pub const IPV4_MIN_HEADER_SIZE: usize = 20;
/// Fixed size of a UDP header.
pub const UDP_HEADER_SIZE: usize = 8;

// IPv4 header field offsets
const IPV4_CHECKSUM: usize = 10;
const IPV4_SRC_ADDR: usize = 12;
const IPV4_DST_ADDR: usize = 16;

// UDP header field offsets
const UDP_SRC_PORT: usize = 0;
const UDP_DST_PORT: usize = 2;
const UDP_LENGTH: usize = 4;
const UDP_CHECKSUM: usize = 6;

/// A captured frame whose IPv4/UDP headers have been rewritten and whose
/// checksums are consistent again, ready for either send path.
pub struct RewrittenFrame {
    frame: Vec<u8>,
    payload_offset: usize,
}

impl RewrittenFrame {
    /// The full link-layer frame, as transmitted by the raw send path.
    pub fn link_frame(&self) -> &[u8] {
        &self.frame
    }

    /// The bytes after the UDP header, as transmitted by the UDP send path.
    pub fn payload(&self) -> &[u8] {
        &self.frame[self.payload_offset..]
    }
}

/// Walks one captured frame through the Ethernet, IPv4 and UDP parsers,
/// threading a running offset and the count of bytes still unparsed.
/// The first failing stage aborts the walk (the frame drops with the
/// error); whatever follows the UDP header is payload and passes through
/// byte-for-byte.
pub fn rewrite_frame(
    mut frame: Vec<u8>,
    rule: &TranslationRule,
) -> Result<RewrittenFrame, RedirectError> {
    let mut offset = 0;

    let parsed = parse_ethernet(&frame)?;
    offset += parsed;

    let parsed = parse_ipv4(
        &mut frame[offset..],
        rule.source_address,
        rule.forward_address,
    )?;
    offset += parsed;

    let parsed = parse_udp(
        &mut frame[offset..],
        rule.listen_port,
        rule.forward_port,
        rule.source_address,
        rule.forward_address,
    )?;
    offset += parsed;

    debug!("{}", hex_dump("data ", &frame[offset..]));

    Ok(RewrittenFrame {
        frame,
        payload_offset: offset,
    })
}

/// Validates that a full Ethernet header was captured.
///
/// The ethertype is not interpreted: the frame passes through whatever
/// link-layer addressing it arrived with. Always consumes exactly
/// [`ETHERNET_HEADER_SIZE`] bytes.
pub fn parse_ethernet(frame: &[u8]) -> Result<usize, RedirectError> {
    if frame.is_empty() {
        return Err(RedirectError::InvalidInput("empty ethernet buffer"));
    }
    if frame.len() < ETHERNET_HEADER_SIZE {
        return Err(ParseError::TooShort {
            layer: "ethernet",
            needed: ETHERNET_HEADER_SIZE,
            available: frame.len(),
        }
        .into());
    }

    debug!("{}", hex_dump("ether", &frame[..ETHERNET_HEADER_SIZE]));

    Ok(ETHERNET_HEADER_SIZE)
}

/// Validates the IPv4 header at the start of `packet`, overwrites its
/// source/destination addresses and recomputes the header checksum.
///
/// Consumes `ihl * 4` bytes, so any IP options are carried along
/// unexamined.
pub fn parse_ipv4(
    packet: &mut [u8],
    new_src: Ipv4Addr,
    new_dst: Ipv4Addr,
) -> Result<usize, RedirectError> {
    if packet.is_empty() {
        return Err(RedirectError::InvalidInput("empty ip buffer"));
    }
    if packet.len() < IPV4_MIN_HEADER_SIZE {
        return Err(ParseError::TooShort {
            layer: "ipv4",
            needed: IPV4_MIN_HEADER_SIZE,
            available: packet.len(),
        }
        .into());
    }

    let version = packet[0] >> 4;
    if version != 4 {
        return Err(ParseError::BadIpVersion(version).into());
    }

    let ihl = packet[0] & 0x0f;
    if ihl < 5 {
        return Err(ParseError::BadIpHeaderLength(ihl).into());
    }

    let header_size = usize::from(ihl) * 4;
    if header_size > packet.len() {
        return Err(ParseError::TruncatedIpHeader {
            declared: header_size,
            available: packet.len(),
        }
        .into());
    }

    packet[IPV4_SRC_ADDR..IPV4_SRC_ADDR + 4].copy_from_slice(&new_src.octets());
    packet[IPV4_DST_ADDR..IPV4_DST_ADDR + 4].copy_from_slice(&new_dst.octets());
    packet[IPV4_CHECKSUM..IPV4_CHECKSUM + 2].copy_from_slice(&[0, 0]);

    let checksum = ipv4_checksum(&packet[..header_size]);
    packet[IPV4_CHECKSUM..IPV4_CHECKSUM + 2].copy_from_slice(&checksum.to_be_bytes());

    debug!("{}", hex_dump("ip   ", &packet[..header_size]));

    Ok(header_size)
}

/// Rewrites the ports of the UDP header at the start of `segment` and
/// recomputes its checksum.
///
/// The destination port becomes the rule's forward port and the source
/// port the rule's listen port, so the redirected flow appears to
/// originate from the listener. `src_addr`/`dst_addr` must be the
/// *already rewritten* IPv4 addresses: the pseudo-header is built from
/// them, which is why IPv4 rewriting has to happen first. The checksum
/// covers the segment's declared length (header length field), bounded
/// against the captured bytes. Always consumes exactly
/// [`UDP_HEADER_SIZE`] bytes.
pub fn parse_udp(
    segment: &mut [u8],
    new_src_port: u16,
    new_dst_port: u16,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> Result<usize, RedirectError> {
    if segment.is_empty() {
        return Err(RedirectError::InvalidInput("empty udp buffer"));
    }
    if segment.len() < UDP_HEADER_SIZE {
        return Err(ParseError::TooShort {
            layer: "udp",
            needed: UDP_HEADER_SIZE,
            available: segment.len(),
        }
        .into());
    }

    let declared = u16::from_be_bytes([segment[UDP_LENGTH], segment[UDP_LENGTH + 1]]);
    let declared_size = usize::from(declared);
    if declared_size < UDP_HEADER_SIZE {
        return Err(ParseError::BadUdpLength(declared).into());
    }
    if declared_size > segment.len() {
        return Err(ParseError::TruncatedUdpSegment {
            declared: declared_size,
            available: segment.len(),
        }
        .into());
    }

    segment[UDP_SRC_PORT..UDP_SRC_PORT + 2].copy_from_slice(&new_src_port.to_be_bytes());
    segment[UDP_DST_PORT..UDP_DST_PORT + 2].copy_from_slice(&new_dst_port.to_be_bytes());
    segment[UDP_CHECKSUM..UDP_CHECKSUM + 2].copy_from_slice(&[0, 0]);

    let checksum = udp_checksum(&segment[..declared_size], src_addr, dst_addr);
    segment[UDP_CHECKSUM..UDP_CHECKSUM + 2].copy_from_slice(&checksum.to_be_bytes());

    debug!("{}", hex_dump("udp  ", &segment[..UDP_HEADER_SIZE]));

    Ok(UDP_HEADER_SIZE)
}
