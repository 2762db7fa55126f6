//! # TTD Protocol - The Wire Codec
//!
//! Binary packet codec for the TTD admin port.
//!
//! ## Architecture
//!
//! - **Packet**: one-byte tag plus an owned payload
//! - **Reader / Writer**: bounds-checked little-endian cursors over the payload
//! - **Framing**: size-prefixed frames on a byte stream
//! - **Dispatch**: an explicit tag → handler table, built once at startup
//!
//! ```text
//! bytes ─► FrameDecoder ─► Packet ─► HandlerRegistry ─► Message ─► Handler
//! ```
//!
//! Socket I/O is not part of this crate. Malformed input always surfaces as
//! a [`CodecError`], never a panic.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ttd_protocol::Packet;
//!
//! let mut packet = Packet::new(0x05);
//! packet.writer().write_u16(300);
//! assert_eq!(packet.bytes(), vec![0x05, 0x2C, 0x01]);
//!
//! let decoded = Packet::from_bytes(&packet.bytes()).unwrap();
//! assert_eq!(decoded.reader().read_u16().unwrap(), 300);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod packet;
pub mod reader;
pub mod writer;

pub use config::CodecConfig;
pub use dispatch::{handle_packet, Dispatch, Handler, HandlerRegistry, Message, RegistryBuilder};
pub use error::{CodecError, CodecResult};
pub use frame::{encode_frame, FrameDecoder, FRAME_HEADER_SIZE};
pub use packet::{Packet, PacketTag, TAG_SIZE};
pub use reader::PacketReader;
pub use writer::PacketWriter;
