use std::net::Ipv4Addr;

/// IANA protocol number of UDP, used in the pseudo-header.
pub const UDP_PROTOCOL_NUMBER: u8 = 17;

/// Computes the IPv4 header checksum.
///
/// The header is summed as big-endian 16-bit words with the checksum field
/// (word 5) treated as zero, carries folded as they appear, and the result
/// complemented. Only the header bytes (`ihl * 4` of them) take part, never
/// the payload.
pub fn ipv4_checksum(ipv4_header: &[u8]) -> u16 {
    assert_eq!(ipv4_header.len() % 2, 0);
    let mut checksum = 0;
    for i in 0..ipv4_header.len() / 2 {
        if i == 5 {
            // Checksum field counts as zero
            continue;
        }
        checksum += (u32::from(ipv4_header[i * 2]) << 8) + u32::from(ipv4_header[i * 2 + 1]);
        if checksum > 0xffff {
            checksum = (checksum & 0xffff) + 1;
        }
    }
    !u16::try_from(checksum).unwrap_or_default()
}

/// Computes the UDP checksum of a header+payload segment.
///
/// The sum covers the RFC 768 pseudo-header (source address, destination
/// address, protocol 17, segment length) followed by the segment itself;
/// an odd trailing byte is padded with zero. The caller must have zeroed
/// the checksum field beforehand.
///
/// A genuine zero result is not representable on the wire (an all-zero
/// checksum field means "no checksum used"), so zero is remapped to 0xffff.
pub fn udp_checksum(udp_segment: &[u8], src_addr: Ipv4Addr, dst_addr: Ipv4Addr) -> u16 {
    let mut sum: u32 = 0;

    for word in src_addr.octets().chunks(2) {
        sum += (u32::from(word[0]) << 8) + u32::from(word[1]);
    }
    for word in dst_addr.octets().chunks(2) {
        sum += (u32::from(word[0]) << 8) + u32::from(word[1]);
    }
    sum += u32::from(UDP_PROTOCOL_NUMBER);
    sum += udp_segment.len() as u32;

    let mut words = udp_segment.chunks_exact(2);
    for word in words.by_ref() {
        sum += (u32::from(word[0]) << 8) + u32::from(word[1]);
    }
    if let Some(&last) = words.remainder().first() {
        // Odd segment length: pad the final byte with zero
        sum += u32::from(last) << 8;
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }

    let checksum = !(sum as u16);
    if checksum == 0 {
        0xffff
    } else {
        checksum
    }
}

/// Plain one's-complement sum over a buffer, checksum field included.
/// A header whose stored checksum is correct folds to 0xffff.
#[cfg(test)]
pub fn ones_complement_sum(bytes: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut words = bytes.chunks_exact(2);
    for word in words.by_ref() {
        sum += (u32::from(word[0]) << 8) + u32::from(word[1]);
    }
    if let Some(&last) = words.remainder().first() {
        sum += u32::from(last) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    sum as u16
}
