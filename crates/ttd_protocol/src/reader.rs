//! # Packet Reader
//!
//! Sequential decode cursor over a packet payload.
//!
//! ## Design
//!
//! - Position index into an immutable borrow; the payload is never resliced
//! - Every advance is bounds-checked and fails with
//!   [`CodecError::BufferUnderrun`] instead of panicking
//! - A failed read consumes nothing
//! - All integers are little-endian

use crate::error::{CodecError, CodecResult};

/// Decode cursor returned by [`crate::Packet::reader`].
#[derive(Clone, Debug)]
pub struct PacketReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PacketReader<'a> {
    /// Creates a reader over a raw payload.
    #[inline]
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the payload.
    #[inline]
    fn rest(&self) -> &'a [u8] {
        self.buffer.get(self.position..).unwrap_or(&[])
    }

    /// Reads the next `n` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than `n` bytes remain.
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        let rest = self.rest();
        let bytes = rest
            .get(..n)
            .ok_or_else(|| CodecError::underrun(n, rest.len()))?;
        self.position += n;
        Ok(bytes)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Returns the next byte without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] on an exhausted payload.
    #[inline]
    pub fn peek_u8(&self) -> CodecResult<u8> {
        self.rest()
            .first()
            .copied()
            .ok_or_else(|| CodecError::underrun(1, 0))
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] on an exhausted payload.
    #[inline]
    pub fn read_u8(&mut self) -> CodecResult<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    /// Reads a u16 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than 2 bytes remain.
    #[inline]
    pub fn read_u16(&mut self) -> CodecResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a u32 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than 4 bytes remain.
    #[inline]
    pub fn read_u32(&mut self) -> CodecResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a u64 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than 8 bytes remain.
    #[inline]
    pub fn read_u64(&mut self) -> CodecResult<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads an i8.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] on an exhausted payload.
    #[inline]
    pub fn read_i8(&mut self) -> CodecResult<i8> {
        self.read_array().map(i8::from_le_bytes)
    }

    /// Reads an i16 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than 2 bytes remain.
    #[inline]
    pub fn read_i16(&mut self) -> CodecResult<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Reads an i32 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than 4 bytes remain.
    #[inline]
    pub fn read_i32(&mut self) -> CodecResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Reads an i64 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if fewer than 8 bytes remain.
    #[inline]
    pub fn read_i64(&mut self) -> CodecResult<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    /// Reads one byte; any non-zero value is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] on an exhausted payload.
    #[inline]
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Reads the raw bytes of a zero-terminated string field at most `max`
    /// bytes wide, without any text decoding.
    ///
    /// The terminator is searched for in the first `max - 1` bytes. If it is
    /// found at offset `i`, the bytes before it are returned and `i + 1`
    /// bytes are consumed. Otherwise the whole `max`-byte field is consumed;
    /// a zero in its last byte is the terminator and is not returned.
    /// Returns the string bytes and the bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if the payload ends before
    /// either a terminator or `max` bytes.
    pub fn read_string_bytes(&mut self, max: usize) -> CodecResult<(&'a [u8], usize)> {
        if max == 0 {
            let empty: &'a [u8] = &[];
            return Ok((empty, 0));
        }

        let rest = self.rest();
        let window = &rest[..rest.len().min(max - 1)];

        if let Some(end) = window.iter().position(|&b| b == 0) {
            self.position += end + 1;
            return Ok((&window[..end], end + 1));
        }

        let raw = self.read_bytes(max)?;
        if let Some((&0, text)) = raw.split_last() {
            return Ok((text, max));
        }
        Ok((raw, max))
    }

    /// Reads a zero-terminated string from a field at most `max` bytes wide.
    ///
    /// Field widths count the terminator, so a string of `max - 1` bytes
    /// followed by a zero fills the field exactly. Consumption follows
    /// [`read_string_bytes`](Self::read_string_bytes). Invalid UTF-8 is
    /// replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if the payload ends before
    /// either a terminator or `max` bytes.
    pub fn read_string(&mut self, max: usize) -> CodecResult<(String, usize)> {
        let (raw, consumed) = self.read_string_bytes(max)?;
        Ok((String::from_utf8_lossy(raw).into_owned(), consumed))
    }
}
