//! Byte cursor over a borrowed input buffer.

use crate::varint;

/// Forward-only reader over a byte slice.
///
/// Every read either succeeds completely and advances the cursor, or fails
/// and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Width of the varint starting at the cursor, without consuming it.
    ///
    /// Returns `None` if there is no byte left to peek at.
    pub fn peek_varint_len(&self) -> Option<usize> {
        self.buf
            .get(self.pos)
            .map(|first| varint::len_from_first_byte(*first))
    }

    pub fn read_varint(&mut self) -> Option<u64> {
        let (value, len) = varint::decode(&self.buf[self.pos..])?;
        self.pos += len;
        Some(value)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Some(bytes)
    }

    /// Reads up to `max` bytes, fewer if the input runs out first.
    pub fn read_at_most(&mut self, max: u64) -> &'a [u8] {
        let len = usize::try_from(max).map_or(self.remaining(), |max| max.min(self.remaining()));
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        bytes
    }

    /// Reads a varint length prefix followed by that many bytes.
    ///
    /// Nothing is consumed unless both the prefix and the bytes are present.
    pub fn read_length_prefixed(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        let len = self.read_varint()?;
        match usize::try_from(len).ok().and_then(|len| self.read_bytes(len)) {
            Some(bytes) => Some(bytes),
            None => {
                self.pos = start;
                None
            }
        }
    }

    /// Reads everything left.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..];
        self.pos = self.buf.len();
        bytes
    }
}
