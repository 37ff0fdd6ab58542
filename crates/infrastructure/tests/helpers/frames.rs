use ferrous_shield_infrastructure::packet::build_udp_datagram;
use std::net::{Ipv4Addr, SocketAddrV4};

pub const CLIENT: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 5), 40000);
pub const RESOLVER: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 2), 53);

/// A standard recursive A query for `name`.
pub fn dns_query(id: u16, name: &str) -> Vec<u8> {
    let mut msg = Vec::new();
    msg.extend_from_slice(&id.to_be_bytes());
    msg.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    for label in name.split('.') {
        msg.push(label.len() as u8);
        msg.extend_from_slice(label.as_bytes());
    }
    msg.push(0);
    msg.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    msg
}

pub fn udp_frame(src: SocketAddrV4, dst: SocketAddrV4, payload: &[u8]) -> Vec<u8> {
    build_udp_datagram(src, dst, payload).unwrap()
}

/// The captured frame of `CLIENT` asking `RESOLVER` for `name`.
pub fn query_frame(id: u16, name: &str) -> Vec<u8> {
    udp_frame(CLIENT, RESOLVER, &dns_query(id, name))
}

/// Same frame with the IP protocol byte replaced (6 = TCP, 1 = ICMP).
pub fn frame_with_protocol(protocol: u8) -> Vec<u8> {
    let mut frame = query_frame(1, "example.com");
    frame[9] = protocol;
    frame
}

/// Decoded view of a datagram written back into the tunnel.
#[derive(Debug)]
pub struct Reply {
    pub src: SocketAddrV4,
    pub dst: SocketAddrV4,
    pub payload: Vec<u8>,
}

pub fn decode_reply(frame: &[u8]) -> Reply {
    assert_eq!(frame[0], 0x45, "IPv4 without options");
    assert_eq!(frame[9], 17, "UDP");
    let ip = |at: usize| Ipv4Addr::new(frame[at], frame[at + 1], frame[at + 2], frame[at + 3]);
    let port = |at: usize| u16::from_be_bytes([frame[at], frame[at + 1]]);
    let udp_len = port(24) as usize;

    Reply {
        src: SocketAddrV4::new(ip(12), port(20)),
        dst: SocketAddrV4::new(ip(16), port(22)),
        payload: frame[28..20 + udp_len].to_vec(),
    }
}
