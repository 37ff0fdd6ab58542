use super::PacketError;

pub const DNS_HEADER_LEN: usize = 12;

/// Longest textual name (without the trailing root dot) DNS can carry.
pub const MAX_NAME_LEN: usize = 253;

const POINTER_MASK: u8 = 0xC0;
const QR_BIT: u8 = 0x80;
const RA_BIT: u8 = 0x80;
const RCODE_NXDOMAIN: u8 = 0x03;

/// Transaction id of a DNS message, if the header is present.
pub fn transaction_id(message: &[u8]) -> Option<u16> {
    match message {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

/// Decodes the first question name of a DNS query.
pub fn parse_query_name(message: &[u8]) -> Result<String, PacketError> {
    if message.len() < DNS_HEADER_LEN {
        return Err(PacketError::TooShort(message.len()));
    }
    parse_name(message, DNS_HEADER_LEN)
}

/// Decodes the name starting at `start` into lowercase dot-joined form.
///
/// At most one compression pointer is followed; a pointer reached after the
/// jump is rejected, which also rules out pointer loops. The root name
/// decodes to an empty string.
pub fn parse_name(message: &[u8], start: usize) -> Result<String, PacketError> {
    let mut name = String::with_capacity(64);
    let mut pos = start;
    let mut jumped = false;

    loop {
        let len = *message.get(pos).ok_or(PacketError::Truncated(pos))?;

        match len & POINTER_MASK {
            0x00 if len == 0 => break,
            0x00 => {
                let begin = pos + 1;
                let end = begin + usize::from(len);
                let label = message.get(begin..end).ok_or(PacketError::Truncated(end))?;

                let separator = usize::from(!name.is_empty());
                if name.len() + separator + label.len() > MAX_NAME_LEN {
                    return Err(PacketError::NameTooLong(MAX_NAME_LEN));
                }
                if separator == 1 {
                    name.push('.');
                }
                name.extend(label.iter().map(|b| char::from(b.to_ascii_lowercase())));
                pos = end;
            }
            POINTER_MASK => {
                if jumped {
                    return Err(PacketError::ChainedPointer(pos));
                }
                let low = *message.get(pos + 1).ok_or(PacketError::Truncated(pos + 1))?;
                let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);
                if target >= message.len() {
                    return Err(PacketError::PointerOutOfRange(target));
                }
                jumped = true;
                pos = target;
            }
            reserved => return Err(PacketError::UnsupportedLabel(reserved)),
        }
    }

    Ok(name)
}

/// Turns a query into an NXDOMAIN answer carrying the same id and question.
///
/// First flags byte: QR set, opcode/AA/TC/RD kept. Second flags byte: upper
/// nibble kept, RA set, RCODE replaced by 3.
pub fn synthesize_nxdomain(query: &[u8]) -> Result<Vec<u8>, PacketError> {
    if query.len() < DNS_HEADER_LEN {
        return Err(PacketError::TooShort(query.len()));
    }

    let mut reply = query.to_vec();
    reply[2] |= QR_BIT;
    reply[3] = (reply[3] & 0xF0) | RA_BIT | RCODE_NXDOMAIN;
    Ok(reply)
}
