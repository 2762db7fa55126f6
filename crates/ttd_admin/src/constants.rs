//! # Admin Port Constants
//!
//! Packet tags and string field widths. Both sides must agree on these;
//! a width mismatch silently shifts every field after the string.

use ttd_protocol::PacketTag;

// =============================================================================
// SERVER -> ADMIN TAGS
// =============================================================================

/// The server has no free admin slots.
pub const SERVER_FULL: PacketTag = 0x00;

/// The admin's address is banned.
pub const SERVER_BANNED: PacketTag = 0x01;

/// The server closed the session with an error code.
pub const SERVER_ERROR: PacketTag = 0x02;

// =============================================================================
// ADMIN -> SERVER TAGS
// =============================================================================

/// Authenticate and open a session.
pub const ADMIN_JOIN: PacketTag = 0x00;

/// Close the session.
pub const ADMIN_QUIT: PacketTag = 0x01;

/// Liveness check; the server echoes the token.
pub const ADMIN_PING: PacketTag = 0x07;

// =============================================================================
// STRING FIELD WIDTHS (terminator included)
// =============================================================================

/// Admin password field.
pub const NETWORK_PASSWORD_LENGTH: usize = 33;

/// Admin client name field.
pub const NETWORK_CLIENT_NAME_LENGTH: usize = 25;

/// Admin client version field.
pub const NETWORK_REVISION_LENGTH: usize = 33;

// =============================================================================
// CLIENT STATE
// =============================================================================

/// Rejections a [`RejectionTracker`](crate::RejectionTracker) keeps by default.
pub const DEFAULT_REJECTION_HISTORY: usize = 64;
