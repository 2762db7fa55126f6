//! # TTD Admin - The Message Catalog
//!
//! Typed admin-port messages built on [`ttd_protocol`].
//!
//! ## Layout
//!
//! - [`server`]: server → admin packets, [`ServerHandlers`] and [`server_registry`]
//! - [`admin`]: admin → server packets
//! - [`constants`]: tags and string field widths
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ttd_admin::{server_registry, Rejection, RejectionTracker, ServerBanned};
//! use ttd_protocol::{CodecConfig, Message};
//!
//! let tracker = Arc::new(RejectionTracker::new());
//! let registry = server_registry(CodecConfig::default(), Arc::clone(&tracker)).unwrap();
//!
//! registry.dispatch(&ServerBanned.to_packet()).unwrap();
//! assert_eq!(tracker.last(), Some(Rejection::Banned));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod admin;
pub mod constants;
pub mod error;
pub mod server;

pub use admin::{AdminJoin, AdminPing, AdminQuit};
pub use error::{AdminError, AdminResult};
pub use server::{
    server_registry, NetworkErrorCode, Rejection, RejectionTracker, ServerBanned, ServerError,
    ServerFull, ServerHandlers,
};
