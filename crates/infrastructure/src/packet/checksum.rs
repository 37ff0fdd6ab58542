/// One's-complement sum of big-endian 16-bit words, carries folded back in.
/// An odd trailing byte is padded with zero.
#[inline]
pub fn ones_complement_sum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(2);
    for word in &mut chunks {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = chunks.remainder() {
        sum += u32::from(*last) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// RFC 1071 internet checksum. Evaluates to zero over a header whose checksum
/// field is already filled in correctly.
#[inline]
pub fn internet_checksum(data: &[u8]) -> u16 {
    !ones_complement_sum(data)
}

/// Checksum for a 20-byte IPv4 header whose checksum field (bytes 10..12) is
/// zero.
#[inline]
pub fn ipv4_header_checksum(header: &[u8]) -> u16 {
    internet_checksum(header)
}
