use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Which send path the rewritten traffic takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full link-layer frame out of the interface owning the source address.
    #[default]
    Raw,
    /// Payload-only datagram through a kernel-managed UDP socket.
    Udp,
}

/// Static mapping of listen port to forward address/port that defines the
/// redirector's single active flow. Validated by the CLI/config layer;
/// the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRule {
    /// Destination port the capture filter matches on.
    pub listen_port: u16,
    /// Destination port written into redirected frames.
    pub forward_port: u16,
    /// Destination address written into redirected frames.
    pub forward_address: Ipv4Addr,
    /// Local address redirected frames appear to originate from.
    pub source_address: Ipv4Addr,
    #[serde(default)]
    pub mode: Mode,
}

impl TranslationRule {
    pub fn from_toml_str(rule: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(rule)
    }

    pub fn forward_socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.forward_address, self.forward_port)
    }
}
