//! # Tag Dispatch
//!
//! Routes decoded packets to handlers by tag.
//!
//! ## Architecture
//!
//! ```text
//! Packet ──► HandlerRegistry ──► Message::decode ──► Handler::handle
//!              (tag lookup)        (per-tag type)     (collaborator)
//! ```
//!
//! The registry is an explicit table, built once at startup with
//! [`RegistryBuilder`] and immutable afterwards. Share it behind an `Arc`
//! for concurrent lookups.
//!
//! Packets whose tag has no handler are silently dropped. That is the
//! protocol contract, not an error: newer servers may send packets older
//! clients do not know about.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};
use crate::packet::{Packet, PacketTag};
use crate::reader::PacketReader;
use crate::writer::PacketWriter;

/// A typed message carried by packets with a fixed tag.
pub trait Message: Sized {
    /// Tag this message travels under.
    const TAG: PacketTag;

    /// Handler category name, used for logging and inspection.
    const CATEGORY: &'static str;

    /// Decodes the message from a packet payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if the payload is truncated.
    fn decode(reader: &mut PacketReader<'_>) -> CodecResult<Self>;

    /// Appends the message fields in protocol order.
    fn encode(&self, writer: &mut PacketWriter<'_>);

    /// Builds a packet carrying this message.
    fn to_packet(&self) -> Packet {
        let mut packet = Packet::new(Self::TAG);
        self.encode(&mut packet.writer());
        packet
    }
}

/// Receives decoded messages of type `M`.
pub trait Handler<M>: Send + Sync {
    /// Handles one message.
    fn handle(&self, message: M);
}

impl<M, F> Handler<M> for F
where
    F: Fn(M) + Send + Sync,
{
    fn handle(&self, message: M) {
        self(message);
    }
}

/// Outcome of a successful dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran.
    Handled {
        /// Packet tag.
        tag: PacketTag,
        /// Category of the handler that ran.
        category: &'static str,
    },
    /// No handler is registered for the tag; the packet was dropped.
    Dropped {
        /// Packet tag.
        tag: PacketTag,
    },
}

impl Dispatch {
    /// Returns true if a handler ran.
    #[inline]
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }
}

type Route = Box<dyn Fn(&mut PacketReader<'_>, bool) -> CodecResult<()> + Send + Sync>;

struct Binding {
    category: &'static str,
    route: Route,
}

/// Collects tag bindings before the registry is frozen.
pub struct RegistryBuilder {
    bindings: BTreeMap<PacketTag, Binding>,
    config: CodecConfig,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if `config` fails
    /// [`CodecConfig::validate`].
    pub fn new(config: CodecConfig) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self {
            bindings: BTreeMap::new(),
            config,
        })
    }

    /// Binds `M::TAG` to `M::decode` followed by `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DuplicateHandler`] if the tag is already bound.
    pub fn register<M, H>(mut self, handler: H) -> CodecResult<Self>
    where
        M: Message + 'static,
        H: Handler<M> + 'static,
    {
        if self.bindings.contains_key(&M::TAG) {
            return Err(CodecError::DuplicateHandler { tag: M::TAG });
        }

        let route: Route = Box::new(
            move |reader: &mut PacketReader<'_>, reject_trailing: bool| {
                let message = M::decode(reader)?;
                check_trailing(M::TAG, reader.remaining(), reject_trailing)?;
                handler.handle(message);
                Ok(())
            },
        );

        self.bindings.insert(
            M::TAG,
            Binding {
                category: M::CATEGORY,
                route,
            },
        );
        Ok(self)
    }

    /// Freezes the table.
    #[must_use]
    pub fn build(self) -> HandlerRegistry {
        tracing::debug!("Handler registry built with {} routes", self.bindings.len());
        HandlerRegistry {
            bindings: self.bindings,
            reject_trailing_bytes: self.config.reject_trailing_bytes,
        }
    }
}

fn check_trailing(tag: PacketTag, remaining: usize, reject: bool) -> CodecResult<()> {
    if remaining == 0 {
        return Ok(());
    }
    if reject {
        return Err(CodecError::TrailingBytes { tag, remaining });
    }
    tracing::debug!(
        "Ignoring {} trailing bytes after tag {:#04x}",
        remaining,
        tag
    );
    Ok(())
}

/// Immutable tag → handler table.
pub struct HandlerRegistry {
    bindings: BTreeMap<PacketTag, Binding>,
    reject_trailing_bytes: bool,
}

impl HandlerRegistry {
    /// Starts a builder with default configuration.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            bindings: BTreeMap::new(),
            config: CodecConfig::default(),
        }
    }

    /// Number of registered tags.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns true if `tag` has a handler.
    #[inline]
    #[must_use]
    pub fn is_registered(&self, tag: PacketTag) -> bool {
        self.bindings.contains_key(&tag)
    }

    /// Category bound to `tag`.
    #[must_use]
    pub fn category(&self, tag: PacketTag) -> Option<&'static str> {
        self.bindings.get(&tag).map(|b| b.category)
    }

    /// Registered `(tag, category)` pairs in tag order.
    pub fn categories(&self) -> impl Iterator<Item = (PacketTag, &'static str)> + '_ {
        self.bindings.iter().map(|(&tag, b)| (tag, b.category))
    }

    /// Decodes `packet` and hands it to the handler bound to its tag.
    ///
    /// # Errors
    ///
    /// Propagates decode failures; the handler is not invoked in that case.
    /// Returns [`CodecError::TrailingBytes`] when configured to reject
    /// leftover payload. Unknown tags are not an error.
    pub fn dispatch(&self, packet: &Packet) -> CodecResult<Dispatch> {
        let tag = packet.tag();
        let Some(binding) = self.bindings.get(&tag) else {
            tracing::trace!("Dropping packet with unregistered tag {:#04x}", tag);
            return Ok(Dispatch::Dropped { tag });
        };

        let mut reader = packet.reader();
        if let Err(e) = (binding.route)(&mut reader, self.reject_trailing_bytes) {
            tracing::warn!(
                "Failed to dispatch {} packet (tag {:#04x}): {}",
                binding.category,
                tag,
                e
            );
            return Err(e);
        }

        tracing::debug!("Dispatched {} packet (tag {:#04x})", binding.category, tag);
        Ok(Dispatch::Handled {
            tag,
            category: binding.category,
        })
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("routes", &self.categories().collect::<Vec<_>>())
            .field("reject_trailing_bytes", &self.reject_trailing_bytes)
            .finish()
    }
}

/// Dispatch entry point: routes `packet` through `registry`.
///
/// # Errors
///
/// See [`HandlerRegistry::dispatch`].
#[inline]
pub fn handle_packet(registry: &HandlerRegistry, packet: &Packet) -> CodecResult<Dispatch> {
    registry.dispatch(packet)
}
