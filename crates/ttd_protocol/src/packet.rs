//! # Packet
//!
//! The unit of wire data: a one-byte type tag plus an owned payload.
//!
//! ```text
//! ┌───────────┬──────────────────────────────┐
//! │ Tag (1)   │ Payload (variable)           │
//! └───────────┴──────────────────────────────┘
//! ```
//!
//! [`Packet::bytes`] emits exactly this layout with no length field. Stream
//! transports wrap it with [`crate::frame::encode_frame`].

use crate::error::{CodecError, CodecResult};
use crate::reader::PacketReader;
use crate::writer::PacketWriter;

/// Packet type tag.
pub type PacketTag = u8;

/// Width of the tag on the wire.
pub const TAG_SIZE: usize = 1;

/// A tagged payload.
///
/// The payload is owned here. Readers borrow it immutably and writers
/// borrow it mutably, so the two can never be live at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    tag: PacketTag,
    payload: Vec<u8>,
}

impl Packet {
    /// Creates an empty packet for writing.
    #[inline]
    #[must_use]
    pub const fn new(tag: PacketTag) -> Self {
        Self {
            tag,
            payload: Vec::new(),
        }
    }

    /// Wraps an already received payload.
    #[inline]
    #[must_use]
    pub const fn with_payload(tag: PacketTag, payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }

    /// Splits unframed bytes (`[tag][payload]`) into a packet.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if `bytes` is empty.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        match bytes.split_first() {
            Some((&tag, payload)) => Ok(Self::with_payload(tag, payload.to_vec())),
            None => Err(CodecError::underrun(TAG_SIZE, 0)),
        }
    }

    /// Returns the type tag.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> PacketTag {
        self.tag
    }

    /// Returns the payload bytes.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Returns a decode cursor positioned at the start of the payload.
    #[inline]
    #[must_use]
    pub fn reader(&self) -> PacketReader<'_> {
        PacketReader::new(&self.payload)
    }

    /// Returns an append cursor over the payload.
    #[inline]
    pub fn writer(&mut self) -> PacketWriter<'_> {
        PacketWriter::new(&mut self.payload)
    }

    /// Serializes to `[tag][payload]`.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(TAG_SIZE + self.payload.len());
        bytes.push(self.tag);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Consumes the packet, returning its payload buffer.
    #[inline]
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}
