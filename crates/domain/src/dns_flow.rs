use std::net::{Ipv4Addr, SocketAddrV4};

/// Addressing of one intercepted DNS exchange.
///
/// `client` is the source of the captured query, `resolver` the virtual
/// resolver it was sent to. Replies travel the other way: from `resolver`
/// back to `client`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DnsFlow {
    pub client: SocketAddrV4,
    pub resolver: SocketAddrV4,
}

impl DnsFlow {
    pub fn new(client: SocketAddrV4, resolver: SocketAddrV4) -> Self {
        Self { client, resolver }
    }

    pub fn from_raw(src_ip: u32, src_port: u16, dst_ip: u32, dst_port: u16) -> Self {
        Self {
            client: SocketAddrV4::new(Ipv4Addr::from(src_ip), src_port),
            resolver: SocketAddrV4::new(Ipv4Addr::from(dst_ip), dst_port),
        }
    }
}
