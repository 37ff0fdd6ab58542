use super::checksum::ipv4_header_checksum;
use super::PacketError;
use ferrous_shield_domain::DnsFlow;
use std::net::SocketAddrV4;

pub const IPV4_HEADER_LEN: usize = 20;
pub const UDP_HEADER_LEN: usize = 8;
pub const IPPROTO_UDP: u8 = 17;
pub const DNS_PORT: u16 = 53;

const VERSION_IHL: u8 = 0x45;
const DONT_FRAGMENT: u16 = 0x4000;
const DEFAULT_TTL: u8 = 64;
const MAX_DATAGRAM_LEN: usize = u16::MAX as usize;

/// A DNS query lifted out of a captured frame. `message` borrows the frame
/// and is byte-for-byte what the client sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsPacket<'a> {
    pub flow: DnsFlow,
    pub message: &'a [u8],
}

/// Parses one captured IPv4 frame, keeping only UDP datagrams addressed to
/// port 53.
pub fn parse_frame(frame: &[u8]) -> Result<DnsPacket<'_>, PacketError> {
    if frame.len() < IPV4_HEADER_LEN {
        return Err(PacketError::TooShort(frame.len()));
    }

    let version = frame[0] >> 4;
    if version != 4 {
        return Err(PacketError::UnsupportedVersion(version));
    }

    let protocol = frame[9];
    if protocol != IPPROTO_UDP {
        return Err(PacketError::NotUdp(protocol));
    }

    let src_ip = u32::from_be_bytes([frame[12], frame[13], frame[14], frame[15]]);
    let dst_ip = u32::from_be_bytes([frame[16], frame[17], frame[18], frame[19]]);

    let header_len = usize::from(frame[0] & 0x0F) * 4;
    if header_len < IPV4_HEADER_LEN || header_len > frame.len() {
        return Err(PacketError::BadHeaderLength(header_len));
    }

    let udp = &frame[header_len..];
    if udp.len() < UDP_HEADER_LEN {
        return Err(PacketError::Truncated(frame.len()));
    }

    let src_port = u16::from_be_bytes([udp[0], udp[1]]);
    let dst_port = u16::from_be_bytes([udp[2], udp[3]]);
    let udp_len = u16::from_be_bytes([udp[4], udp[5]]);

    if dst_port != DNS_PORT {
        return Err(PacketError::NotDns(dst_port));
    }

    let dns_len = usize::from(udp_len)
        .checked_sub(UDP_HEADER_LEN)
        .filter(|len| *len > 0)
        .ok_or(PacketError::BadUdpLength(udp_len))?;

    let payload = &udp[UDP_HEADER_LEN..];
    if payload.len() < dns_len {
        return Err(PacketError::Truncated(frame.len()));
    }

    Ok(DnsPacket {
        flow: DnsFlow::from_raw(src_ip, src_port, dst_ip, dst_port),
        message: &payload[..dns_len],
    })
}

/// Encodes `payload` as a minimal IPv4/UDP datagram from `src` to `dst`.
///
/// IPv4: no options, DF set, TTL 64, id 0, header checksum filled in.
/// UDP: checksum 0, which IPv4 permits.
pub fn build_udp_datagram(
    src: SocketAddrV4,
    dst: SocketAddrV4,
    payload: &[u8],
) -> Result<Vec<u8>, PacketError> {
    let udp_len = UDP_HEADER_LEN + payload.len();
    let total_len = IPV4_HEADER_LEN + udp_len;
    if total_len > MAX_DATAGRAM_LEN {
        return Err(PacketError::PayloadTooLarge(payload.len()));
    }

    let mut out = Vec::with_capacity(total_len);

    out.push(VERSION_IHL);
    out.push(0x00);
    out.extend_from_slice(&(total_len as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&DONT_FRAGMENT.to_be_bytes());
    out.push(DEFAULT_TTL);
    out.push(IPPROTO_UDP);
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&src.ip().octets());
    out.extend_from_slice(&dst.ip().octets());

    let checksum = ipv4_header_checksum(&out[..IPV4_HEADER_LEN]);
    out[10..12].copy_from_slice(&checksum.to_be_bytes());

    out.extend_from_slice(&src.port().to_be_bytes());
    out.extend_from_slice(&dst.port().to_be_bytes());
    out.extend_from_slice(&(udp_len as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());

    out.extend_from_slice(payload);
    Ok(out)
}
