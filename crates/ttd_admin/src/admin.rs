//! # Admin Messages
//!
//! Packets an admin client sends to the server.

use ttd_protocol::{CodecResult, Message, PacketReader, PacketTag, PacketWriter};

use crate::constants::{
    ADMIN_JOIN, ADMIN_PING, ADMIN_QUIT, NETWORK_CLIENT_NAME_LENGTH, NETWORK_PASSWORD_LENGTH,
    NETWORK_REVISION_LENGTH,
};
use crate::error::{AdminError, AdminResult};

/// Opens an admin session.
///
/// ```text
/// password (≤33) │ name (≤25) │ version (≤33)     all zero-terminated
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminJoin {
    password: String,
    name: String,
    version: String,
}

impl AdminJoin {
    /// Builds a join request, checking each string against its field width.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::FieldTooLong`] if a string plus its terminator
    /// exceeds the field, or [`AdminError::InteriorNul`] if a string holds a
    /// zero byte.
    pub fn new(
        password: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> AdminResult<Self> {
        let join = Self {
            password: password.into(),
            name: name.into(),
            version: version.into(),
        };
        check_width("password", &join.password, NETWORK_PASSWORD_LENGTH)?;
        check_width("name", &join.name, NETWORK_CLIENT_NAME_LENGTH)?;
        check_width("version", &join.version, NETWORK_REVISION_LENGTH)?;
        Ok(join)
    }

    /// Admin password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Client name shown in server logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Client version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

fn check_width(field: &'static str, value: &str, max: usize) -> AdminResult<()> {
    if value.contains('\0') {
        return Err(AdminError::InteriorNul { field });
    }
    if value.len() + 1 > max {
        return Err(AdminError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

impl Message for AdminJoin {
    const TAG: PacketTag = ADMIN_JOIN;
    const CATEGORY: &'static str = "join";

    fn decode(reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        let (password, _) = reader.read_string(NETWORK_PASSWORD_LENGTH)?;
        let (name, _) = reader.read_string(NETWORK_CLIENT_NAME_LENGTH)?;
        let (version, _) = reader.read_string(NETWORK_REVISION_LENGTH)?;
        Ok(Self {
            password,
            name,
            version,
        })
    }

    fn encode(&self, writer: &mut PacketWriter<'_>) {
        writer.write_string(&self.password);
        writer.write_string(&self.name);
        writer.write_string(&self.version);
    }
}

/// Closes the admin session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdminQuit;

impl Message for AdminQuit {
    const TAG: PacketTag = ADMIN_QUIT;
    const CATEGORY: &'static str = "quit";

    fn decode(_reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        Ok(Self)
    }

    fn encode(&self, _writer: &mut PacketWriter<'_>) {}
}

/// Liveness check; the server echoes the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdminPing {
    /// Opaque token.
    pub token: u32,
}

impl Message for AdminPing {
    const TAG: PacketTag = ADMIN_PING;
    const CATEGORY: &'static str = "ping";

    fn decode(reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            token: reader.read_u32()?,
        })
    }

    fn encode(&self, writer: &mut PacketWriter<'_>) {
        writer.write_u32(self.token);
    }
}
