//! # Admin Error Types

use thiserror::Error;
use ttd_protocol::CodecError;

/// Errors raised while building admin messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// A string would not fit its fixed-width wire field.
    #[error("{field} is {len} bytes, field holds at most {max} including terminator")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Encoded length without terminator.
        len: usize,
        /// Field width including terminator.
        max: usize,
    },

    /// A string contains a zero byte, which would end its field early.
    #[error("{field} contains a zero byte")]
    InteriorNul {
        /// Field name.
        field: &'static str,
    },

    /// Codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;
