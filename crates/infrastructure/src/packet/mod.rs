//! Raw IPv4/UDP/DNS byte handling for the tunnel.
//!
//! Everything here is stateless and allocation-light: frames are parsed in
//! place and replies are encoded into a single buffer.

pub mod checksum;
pub mod dns_codec;
pub mod ipv4;

pub use checksum::{internet_checksum, ipv4_header_checksum};
pub use dns_codec::{parse_name, parse_query_name, synthesize_nxdomain, transaction_id};
pub use ipv4::{build_udp_datagram, parse_frame, DnsPacket};

use thiserror::Error;

/// Why a frame or DNS message was rejected. Rejections are silent drops; the
/// variants exist for trace-level diagnostics and tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("frame too short: {0} bytes")]
    TooShort(usize),

    #[error("unsupported IP version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid IPv4 header length {0}")]
    BadHeaderLength(usize),

    #[error("not UDP (protocol {0})")]
    NotUdp(u8),

    #[error("not DNS (destination port {0})")]
    NotDns(u16),

    #[error("invalid UDP length {0}")]
    BadUdpLength(u16),

    #[error("truncated at offset {0}")]
    Truncated(usize),

    #[error("compression pointer to {0} is out of range")]
    PointerOutOfRange(usize),

    #[error("chained compression pointer at offset {0}")]
    ChainedPointer(usize),

    #[error("unsupported label type 0x{0:02x}")]
    UnsupportedLabel(u8),

    #[error("name exceeds {0} bytes")]
    NameTooLong(usize),

    #[error("payload of {0} bytes does not fit in one datagram")]
    PayloadTooLarge(usize),
}
