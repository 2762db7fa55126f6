//! # Stream Framing
//!
//! Packets travel over a byte stream with a length prefix:
//!
//! ```text
//! ┌──────────────┬──────────┬──────────────────────────┐
//! │ Size (2, LE) │ Tag (1)  │ Payload (size - 3)       │
//! └──────────────┴──────────┴──────────────────────────┘
//! ```
//!
//! `Size` counts the whole frame, the two size bytes included. The decoder
//! accumulates whatever the transport delivers and yields complete packets.

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};
use crate::packet::{Packet, TAG_SIZE};

/// Width of the size prefix.
pub const SIZE_PREFIX: usize = 2;

/// Size prefix plus tag.
pub const FRAME_HEADER_SIZE: usize = SIZE_PREFIX + TAG_SIZE;

/// Wraps a packet in a size-prefixed frame.
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLarge`] if the frame would exceed
/// `config.max_frame_size`.
pub fn encode_frame(packet: &Packet, config: &CodecConfig) -> CodecResult<Vec<u8>> {
    let size = FRAME_HEADER_SIZE + packet.len();
    let max = config.max_frame_size.min(usize::from(u16::MAX));
    if size > max {
        return Err(CodecError::FrameTooLarge { size, max });
    }
    let prefix = u16::try_from(size).map_err(|_| CodecError::FrameTooLarge { size, max })?;

    let mut frame = Vec::with_capacity(size);
    frame.extend_from_slice(&prefix.to_le_bytes());
    frame.extend_from_slice(&packet.bytes());
    Ok(frame)
}

/// Reassembles packets from a byte stream.
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    max_frame_size: usize,
}

impl FrameDecoder {
    /// Creates a decoder enforcing `config.max_frame_size`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if `config` fails
    /// [`CodecConfig::validate`].
    pub fn new(config: &CodecConfig) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self {
            buffer: Vec::new(),
            max_frame_size: config.max_frame_size,
        })
    }

    /// Appends bytes received from the transport.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes received but not yet returned as packets.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Pops the next complete packet.
    ///
    /// Returns `Ok(None)` while the buffered bytes hold no complete frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FrameTooShort`] or [`CodecError::FrameTooLarge`]
    /// when the size prefix is invalid. The offending bytes stay buffered;
    /// the stream cannot be resynchronised and should be dropped.
    pub fn next_packet(&mut self) -> CodecResult<Option<Packet>> {
        let Some(prefix) = self.buffer.get(..SIZE_PREFIX) else {
            return Ok(None);
        };
        let size = usize::from(u16::from_le_bytes([prefix[0], prefix[1]]));

        if size < FRAME_HEADER_SIZE {
            tracing::warn!("Rejecting frame with declared size {}", size);
            return Err(CodecError::FrameTooShort { size });
        }
        if size > self.max_frame_size {
            tracing::warn!(
                "Rejecting frame of {} bytes (limit {})",
                size,
                self.max_frame_size
            );
            return Err(CodecError::FrameTooLarge {
                size,
                max: self.max_frame_size,
            });
        }
        if self.buffer.len() < size {
            return Ok(None);
        }

        let frame: Vec<u8> = self.buffer.drain(..size).collect();
        let packet = Packet::from_bytes(&frame[SIZE_PREFIX..])?;
        tracing::trace!("Decoded frame: tag={:#04x}, {} bytes", packet.tag(), size);
        Ok(Some(packet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_packet() -> Packet {
        let mut packet = Packet::new(0x05);
        packet.writer().write_u16(300);
        packet
    }

    #[test]
    fn test_encode_frame_layout() {
        let frame = encode_frame(&sample_packet(), &CodecConfig::default()).unwrap();
        assert_eq!(frame, vec![0x05, 0x00, 0x05, 0x2C, 0x01]);
    }

    #[test]
    fn test_encode_frame_too_large() {
        let config = CodecConfig {
            max_frame_size: 4,
            ..CodecConfig::default()
        };
        let err = encode_frame(&sample_packet(), &config).unwrap_err();
        assert_eq!(err, CodecError::FrameTooLarge { size: 5, max: 4 });
    }

    #[test]
    fn test_decode_single_frame() {
        let config = CodecConfig::default();
        let mut decoder = FrameDecoder::new(&config).unwrap();
        decoder.extend(&encode_frame(&sample_packet(), &config).unwrap());

        let packet = decoder.next_packet().unwrap().unwrap();
        assert_eq!(packet, sample_packet());
        assert_eq!(decoder.buffered(), 0);
        assert!(decoder.next_packet().unwrap().is_none());
    }

    #[test]
    fn test_decode_partial_then_complete() {
        let config = CodecConfig::default();
        let frame = encode_frame(&sample_packet(), &config).unwrap();
        let mut decoder = FrameDecoder::new(&config).unwrap();

        decoder.extend(&frame[..1]);
        assert!(decoder.next_packet().unwrap().is_none());
        decoder.extend(&frame[1..4]);
        assert!(decoder.next_packet().unwrap().is_none());
        decoder.extend(&frame[4..]);
        assert_eq!(decoder.next_packet().unwrap(), Some(sample_packet()));
    }

    #[test]
    fn test_decode_back_to_back() {
        let config = CodecConfig::default();
        let mut decoder = FrameDecoder::new(&config).unwrap();
        let empty = Packet::new(0x01);

        let mut stream = encode_frame(&empty, &config).unwrap();
        stream.extend(encode_frame(&sample_packet(), &config).unwrap());
        decoder.extend(&stream);

        assert_eq!(decoder.next_packet().unwrap(), Some(empty));
        assert_eq!(decoder.next_packet().unwrap(), Some(sample_packet()));
        assert_eq!(decoder.next_packet().unwrap(), None);
    }

    #[test]
    fn test_decode_rejects_short_size() {
        let mut decoder = FrameDecoder::new(&CodecConfig::default()).unwrap();
        decoder.extend(&[0x02, 0x00, 0xFF]);
        assert_eq!(
            decoder.next_packet(),
            Err(CodecError::FrameTooShort { size: 2 })
        );
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let config = CodecConfig {
            max_frame_size: 16,
            ..CodecConfig::default()
        };
        let mut decoder = FrameDecoder::new(&config).unwrap();
        decoder.extend(&[0x20, 0x00]);
        assert_eq!(
            decoder.next_packet(),
            Err(CodecError::FrameTooLarge { size: 32, max: 16 })
        );
    }

    #[test]
    fn test_decoder_rejects_invalid_config() {
        for max_frame_size in [0, 2, 70_000] {
            let config = CodecConfig {
                max_frame_size,
                ..CodecConfig::default()
            };
            assert!(matches!(
                FrameDecoder::new(&config),
                Err(CodecError::InvalidConfig(_))
            ));
        }
    }
}
