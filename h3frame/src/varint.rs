//! Variable-length integer encoding per RFC 9000 Section 16.
//!
//! HTTP/3 inherits QUIC's variable-length integer encoding for frame types,
//! frame lengths, push IDs, settings parameters and string length prefixes.
//! The two high bits of the first byte select a width of 1, 2, 4 or 8 bytes.

use bytes::BufMut;

/// Maximum value that can be encoded (2^62 - 1)
pub const MAX: u64 = (1u64 << 62) - 1;

/// Widest possible encoding.
pub const MAX_LEN: usize = 8;

/// Width in bytes of the varint whose first byte is `first`.
#[inline]
pub fn len_from_first_byte(first: u8) -> usize {
    1 << (first >> 6)
}

/// Decode a variable-length integer from the start of `data`.
///
/// Returns the decoded value and the number of bytes consumed, or `None`
/// if `data` is shorter than the width announced by its first byte.
pub fn decode(data: &[u8]) -> Option<(u64, usize)> {
    let first = *data.first()?;
    let len = len_from_first_byte(first);
    if data.len() < len {
        return None;
    }

    let value = data[1..len]
        .iter()
        .fold((first & 0x3f) as u64, |acc, b| (acc << 8) | *b as u64);
    Some((value, len))
}

/// Calculate the encoded length of a varint without encoding it.
pub fn encoded_len(value: u64) -> usize {
    if value < 64 {
        1
    } else if value < 16384 {
        2
    } else if value < 1073741824 {
        4
    } else {
        8
    }
}

/// Encode a variable-length integer into a buffer that implements BufMut.
///
/// Values above [`MAX`] are truncated to 62 bits.
pub fn encode_buf<B: BufMut>(value: u64, buf: &mut B) -> usize {
    debug_assert!(value <= MAX, "varint value {} exceeds maximum", value);
    match encoded_len(value) {
        1 => buf.put_u8(value as u8),
        2 => buf.put_u16((value as u16) | 0x4000),
        4 => buf.put_u32((value as u32) | 0x8000_0000),
        _ => buf.put_u64((value & MAX) | 0xc000_0000_0000_0000),
    }
    encoded_len(value)
}
