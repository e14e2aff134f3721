use std::io;
use std::net::Ipv4Addr;

/// Error produced by any stage of the redirect pipeline.
///
/// Every stage returns one of these instead of aborting the process;
/// the pipeline stops at the first failure and releases whatever it owns
/// (sockets are closed on drop, the frame buffer is freed) before
/// propagating.
#[derive(Debug, thiserror::Error)]
pub enum RedirectError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("{op} failed: {source}")]
    Socket {
        op: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("could not parse frame: {0}")]
    Parse(#[from] ParseError),
    #[error("no interface owns address {0}")]
    Resolution(Ipv4Addr),
    #[error("could not enumerate network interfaces: {0}")]
    InterfaceList(String),
}

/// Reason a captured frame was rejected by the header parsers.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{layer} header needs {needed} bytes, {available} left")]
    TooShort {
        layer: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("IP version field is {0}, expected 4")]
    BadIpVersion(u8),
    #[error("IP header length field is {0}, minimum is 5 words")]
    BadIpHeaderLength(u8),
    #[error("IP header declares {declared} bytes but only {available} were captured")]
    TruncatedIpHeader { declared: usize, available: usize },
    #[error("UDP length field is {0}, minimum is 8")]
    BadUdpLength(u16),
    #[error("UDP length field declares {declared} bytes but only {available} were captured")]
    TruncatedUdpSegment { declared: usize, available: usize },
}
