//! # Packet Writer
//!
//! Append-only encode cursor over a packet payload. Integers are written
//! little-endian, strings as raw bytes plus a single zero terminator.

/// Encode cursor returned by [`crate::Packet::writer`].
#[derive(Debug)]
pub struct PacketWriter<'a> {
    payload: &'a mut Vec<u8>,
}

impl<'a> PacketWriter<'a> {
    /// Creates a writer appending to `payload`.
    #[inline]
    pub fn new(payload: &'a mut Vec<u8>) -> Self {
        Self { payload }
    }

    /// Returns the payload length so far.
    #[inline]
    #[must_use]
    pub fn written(&self) -> usize {
        self.payload.len()
    }

    /// Appends raw bytes, returning how many were written.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        self.payload.extend_from_slice(bytes);
        bytes.len()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.payload.push(value);
    }

    /// Writes a u16 in little-endian format.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u64 in little-endian format.
    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes an i8.
    #[inline]
    pub fn write_i8(&mut self, value: i8) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes an i16 in little-endian format.
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes an i64 in little-endian format.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes `0x01` for true, `0x00` for false.
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes `value` followed by a zero terminator.
    ///
    /// Returns the bytes written, `value.len() + 1`. The caller is
    /// responsible for keeping the string within the field width the
    /// receiving side reads with, and free of zero bytes, which the reader
    /// would take as an early terminator.
    #[inline]
    pub fn write_string(&mut self, value: &str) -> usize {
        let written = self.write_bytes(value.as_bytes());
        self.write_u8(0);
        written + 1
    }
}
