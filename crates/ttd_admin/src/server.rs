//! # Server Messages
//!
//! Packets the server sends to an admin client, and the wiring that
//! routes them to a [`ServerHandlers`] implementation.
//!
//! | Tag  | Message        | Category | Payload          |
//! |------|----------------|----------|------------------|
//! | 0x00 | [`ServerFull`]   | `full`   | none             |
//! | 0x01 | [`ServerBanned`] | `banned` | none             |
//! | 0x02 | [`ServerError`]  | `error`  | error code (u8)  |

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use ttd_protocol::{
    CodecConfig, CodecResult, HandlerRegistry, Message, PacketReader, PacketTag, PacketWriter,
    RegistryBuilder,
};

use crate::constants::{DEFAULT_REJECTION_HISTORY, SERVER_BANNED, SERVER_ERROR, SERVER_FULL};

/// Reason codes carried by [`ServerError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkErrorCode {
    /// Unspecified failure.
    General,
    /// Game state diverged.
    Desync,
    /// Savegame transfer failed.
    SavegameFailed,
    /// Connection dropped.
    ConnectionLost,
    /// Malformed packet received.
    IllegalPacket,
    /// NewGRF set differs.
    NewgrfMismatch,
    /// Not authorized.
    NotAuthorized,
    /// Packet not expected in this state.
    NotExpected,
    /// Version mismatch.
    WrongRevision,
    /// Name already taken.
    NameInUse,
    /// Wrong password.
    WrongPassword,
    /// Company mismatch.
    CompanyMismatch,
    /// Kicked by the server.
    Kicked,
    /// Cheating detected.
    Cheater,
    /// Server full.
    Full,
    /// Command flood.
    TooManyCommands,
    /// Password entry timed out.
    TimeoutPassword,
    /// Client too slow.
    TimeoutComputer,
    /// Map download timed out.
    TimeoutMap,
    /// Join timed out.
    TimeoutJoin,
    /// Client name rejected.
    InvalidClientName,
    /// A code this build does not know.
    Unknown(u8),
}

impl NetworkErrorCode {
    /// Decodes a wire value. Unrecognised values are preserved.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::General,
            1 => Self::Desync,
            2 => Self::SavegameFailed,
            3 => Self::ConnectionLost,
            4 => Self::IllegalPacket,
            5 => Self::NewgrfMismatch,
            6 => Self::NotAuthorized,
            7 => Self::NotExpected,
            8 => Self::WrongRevision,
            9 => Self::NameInUse,
            10 => Self::WrongPassword,
            11 => Self::CompanyMismatch,
            12 => Self::Kicked,
            13 => Self::Cheater,
            14 => Self::Full,
            15 => Self::TooManyCommands,
            16 => Self::TimeoutPassword,
            17 => Self::TimeoutComputer,
            18 => Self::TimeoutMap,
            19 => Self::TimeoutJoin,
            20 => Self::InvalidClientName,
            other => Self::Unknown(other),
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::General => 0,
            Self::Desync => 1,
            Self::SavegameFailed => 2,
            Self::ConnectionLost => 3,
            Self::IllegalPacket => 4,
            Self::NewgrfMismatch => 5,
            Self::NotAuthorized => 6,
            Self::NotExpected => 7,
            Self::WrongRevision => 8,
            Self::NameInUse => 9,
            Self::WrongPassword => 10,
            Self::CompanyMismatch => 11,
            Self::Kicked => 12,
            Self::Cheater => 13,
            Self::Full => 14,
            Self::TooManyCommands => 15,
            Self::TimeoutPassword => 16,
            Self::TimeoutComputer => 17,
            Self::TimeoutMap => 18,
            Self::TimeoutJoin => 19,
            Self::InvalidClientName => 20,
            Self::Unknown(other) => other,
        }
    }
}

impl fmt::Display for NetworkErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::General => "general error",
            Self::Desync => "desync",
            Self::SavegameFailed => "savegame transfer failed",
            Self::ConnectionLost => "connection lost",
            Self::IllegalPacket => "illegal packet",
            Self::NewgrfMismatch => "NewGRF mismatch",
            Self::NotAuthorized => "not authorized",
            Self::NotExpected => "unexpected packet",
            Self::WrongRevision => "wrong revision",
            Self::NameInUse => "name in use",
            Self::WrongPassword => "wrong password",
            Self::CompanyMismatch => "company mismatch",
            Self::Kicked => "kicked",
            Self::Cheater => "cheater",
            Self::Full => "server full",
            Self::TooManyCommands => "too many commands",
            Self::TimeoutPassword => "password timeout",
            Self::TimeoutComputer => "computer too slow",
            Self::TimeoutMap => "map download timeout",
            Self::TimeoutJoin => "join timeout",
            Self::InvalidClientName => "invalid client name",
            Self::Unknown(code) => return write!(f, "unknown error {code}"),
        };
        f.write_str(text)
    }
}

/// The server has no free admin slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerFull;

impl Message for ServerFull {
    const TAG: PacketTag = SERVER_FULL;
    const CATEGORY: &'static str = "full";

    fn decode(_reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        Ok(Self)
    }

    fn encode(&self, _writer: &mut PacketWriter<'_>) {}
}

/// The admin's address is banned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerBanned;

impl Message for ServerBanned {
    const TAG: PacketTag = SERVER_BANNED;
    const CATEGORY: &'static str = "banned";

    fn decode(_reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        Ok(Self)
    }

    fn encode(&self, _writer: &mut PacketWriter<'_>) {}
}

/// The server closed the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerError {
    /// Why.
    pub code: NetworkErrorCode,
}

impl Message for ServerError {
    const TAG: PacketTag = SERVER_ERROR;
    const CATEGORY: &'static str = "error";

    fn decode(reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        let code = NetworkErrorCode::from_u8(reader.read_u8()?);
        Ok(Self { code })
    }

    fn encode(&self, writer: &mut PacketWriter<'_>) {
        writer.write_u8(self.code.as_u8());
    }
}

/// Collaborator callbacks for server messages.
///
/// Every method defaults to a no-op so implementors only override what
/// they care about.
pub trait ServerHandlers: Send + Sync {
    /// Server full.
    fn on_full(&self, _message: ServerFull) {}

    /// Banned.
    fn on_banned(&self, _message: ServerBanned) {}

    /// Session closed with an error.
    fn on_error(&self, _message: ServerError) {}
}

/// Builds the registry routing every server message to `handlers`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidConfig`](ttd_protocol::CodecError::InvalidConfig)
/// if `config` fails validation, or
/// [`CodecError::DuplicateHandler`](ttd_protocol::CodecError::DuplicateHandler)
/// if two catalog messages share a tag.
pub fn server_registry<H>(config: CodecConfig, handlers: Arc<H>) -> CodecResult<HandlerRegistry>
where
    H: ServerHandlers + 'static,
{
    let full = Arc::clone(&handlers);
    let banned = Arc::clone(&handlers);
    let error = handlers;

    Ok(RegistryBuilder::new(config)?
        .register::<ServerFull, _>(move |message: ServerFull| full.on_full(message))?
        .register::<ServerBanned, _>(move |message: ServerBanned| banned.on_banned(message))?
        .register::<ServerError, _>(move |message: ServerError| error.on_error(message))?
        .build())
}

/// Why the server refused or ended a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No free slots.
    Full,
    /// Address banned.
    Banned,
    /// Closed with an error code.
    Error(NetworkErrorCode),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("server full"),
            Self::Banned => f.write_str("banned"),
            Self::Error(code) => write!(f, "error: {code}"),
        }
    }
}

/// [`ServerHandlers`] that records rejections in arrival order.
///
/// Only the most recent `capacity` rejections are kept; older ones are
/// discarded as new ones arrive.
#[derive(Debug)]
pub struct RejectionTracker {
    rejections: Mutex<VecDeque<Rejection>>,
    capacity: usize,
}

impl Default for RejectionTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_REJECTION_HISTORY)
    }
}

impl RejectionTracker {
    /// Creates an empty tracker keeping [`DEFAULT_REJECTION_HISTORY`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tracker keeping at most `capacity` entries.
    /// A capacity of zero is raised to one so [`last`](Self::last) still works.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rejections: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Maximum number of rejections kept.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent rejection, if any.
    #[must_use]
    pub fn last(&self) -> Option<Rejection> {
        self.rejections.lock().back().copied()
    }

    /// Retained rejections, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Rejection> {
        self.rejections.lock().iter().copied().collect()
    }

    fn record(&self, rejection: Rejection) {
        tracing::info!("Server rejected admin session: {}", rejection);
        let mut rejections = self.rejections.lock();
        if rejections.len() == self.capacity {
            rejections.pop_front();
        }
        rejections.push_back(rejection);
    }
}

impl ServerHandlers for RejectionTracker {
    fn on_full(&self, _message: ServerFull) {
        self.record(Rejection::Full);
    }

    fn on_banned(&self, _message: ServerBanned) {
        self.record(Rejection::Banned);
    }

    fn on_error(&self, message: ServerError) {
        self.record(Rejection::Error(message.code));
    }
}
