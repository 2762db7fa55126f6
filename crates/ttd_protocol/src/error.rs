//! # Codec Error Types
//!
//! All errors that can occur while decoding, framing or dispatching packets.

use thiserror::Error;

/// Errors that can occur in the codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A read asked for more bytes than the payload still holds.
    #[error("buffer underrun: requested {requested} bytes, {remaining} remaining")]
    BufferUnderrun {
        /// Bytes the read needed.
        requested: usize,
        /// Bytes left in the payload.
        remaining: usize,
    },

    /// A second handler was registered for a tag.
    #[error("handler already registered for tag {tag:#04x}")]
    DuplicateHandler {
        /// The contested tag.
        tag: u8,
    },

    /// A message decoded cleanly but left payload behind.
    #[error("{remaining} trailing bytes after decoding tag {tag:#04x}")]
    TrailingBytes {
        /// Tag of the offending packet.
        tag: u8,
        /// Bytes left unread.
        remaining: usize,
    },

    /// A frame header declared a size smaller than the header itself.
    #[error("frame too short: declared size {size}")]
    FrameTooShort {
        /// Declared frame size.
        size: usize,
    },

    /// A frame exceeds the configured maximum.
    #[error("frame too large: {size} bytes, limit {max}")]
    FrameTooLarge {
        /// Frame size in bytes.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// Configuration failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("i/o error: {0}")]
    Io(String),
}

impl CodecError {
    /// Shorthand for a [`CodecError::BufferUnderrun`].
    #[inline]
    #[must_use]
    pub const fn underrun(requested: usize, remaining: usize) -> Self {
        Self::BufferUnderrun { requested, remaining }
    }

    /// Returns true if the error came from running out of payload.
    #[inline]
    #[must_use]
    pub const fn is_underrun(&self) -> bool {
        matches!(self, Self::BufferUnderrun { .. })
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underrun_message() {
        let err = CodecError::underrun(4, 3);
        assert!(err.is_underrun());
        assert_eq!(
            err.to_string(),
            "buffer underrun: requested 4 bytes, 3 remaining"
        );
    }

    #[test]
    fn test_tag_formatting() {
        let err = CodecError::DuplicateHandler { tag: 0x01 };
        assert_eq!(err.to_string(), "handler already registered for tag 0x01");
        assert!(!err.is_underrun());
    }
}
