/// Number of instructions in the UDP destination-port filter.
pub const FILTER_LEN: usize = 16;

/// Indices of the two instructions whose immediate operand carries the
/// target port: one in the IPv6 decode branch, one in the IPv4 branch.
const PORT_SLOT_V6: usize = 5;
const PORT_SLOT_V4: usize = 13;

/// One classic-BPF instruction, laid out exactly as `struct sock_filter`
/// so a program can be handed to `SO_ATTACH_FILTER` as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOp {
    pub code: u16,
    pub jt: u8,
    pub jf: u8,
    pub k: u32,
}

const fn op(code: u16, jt: u8, jf: u8, k: u32) -> FilterOp {
    FilterOp { code, jt, jf, k }
}

/// Builds the classifier attached to the capture socket: accept a frame
/// iff it is IPv4, protocol UDP, not a fragment, and its UDP destination
/// port equals `port`; reject everything else (the IPv6 branch compares
/// against the same port but falls through to reject).
///
/// The template is fixed; only the two port immediates are patched, both
/// from the same value so the two decode branches can never drift apart.
/// A `u16` port is always in range, so construction cannot fail.
pub fn udp_dst_port_filter(port: u16) -> [FilterOp; FILTER_LEN] {
    // tcpdump -dd 'udp dst port X', with the port immediates blanked
    let mut code = [
        op(0x28, 0, 0, 0x0000000c),
        op(0x15, 0, 4, 0x000086dd),
        op(0x30, 0, 0, 0x00000014),
        op(0x15, 0, 11, 0x00000011),
        op(0x28, 0, 0, 0x00000038),
        op(0x15, 8, 9, 0xffffffff),
        op(0x15, 0, 8, 0x00000800),
        op(0x30, 0, 0, 0x00000017),
        op(0x15, 0, 6, 0x00000011),
        op(0x28, 0, 0, 0x00000014),
        op(0x45, 4, 0, 0x00001fff),
        op(0xb1, 0, 0, 0x0000000e),
        op(0x48, 0, 0, 0x00000010),
        op(0x15, 0, 1, 0xffffffff),
        op(0x6, 0, 0, 0x00040000),
        op(0x6, 0, 0, 0x00000000),
    ];

    code[PORT_SLOT_V6].k = u32::from(port);
    code[PORT_SLOT_V4].k = u32::from(port);

    code
}
