//! # Codec Configuration
//!
//! Limits for framing and dispatch, loaded once at startup from TOML.
//!
//! ```toml
//! max_frame_size = 1460
//! reject_trailing_bytes = false
//! ```
//!
//! Missing keys fall back to [`CodecConfig::default`].

use std::path::Path;

use serde::Deserialize;

use crate::error::{CodecError, CodecResult};
use crate::frame::FRAME_HEADER_SIZE;

/// Default frame limit, the TCP MTU the admin port sends with.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1460;

/// Codec limits shared by the frame decoder and the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Largest frame accepted or emitted, size prefix included.
    pub max_frame_size: usize,
    /// Fail dispatch when a message leaves payload bytes unread.
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            reject_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] on malformed TOML, unknown keys
    /// or out-of-range values.
    pub fn from_toml_str(source: &str) -> CodecResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`CodecConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CodecError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            "Loaded codec config from {}: max_frame_size={}, reject_trailing_bytes={}",
            path.display(),
            config.max_frame_size,
            config.reject_trailing_bytes
        );
        Ok(config)
    }

    /// Checks that the limits describe a usable frame format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if `max_frame_size` cannot hold
    /// a frame header or does not fit the 16-bit size prefix.
    pub fn validate(&self) -> CodecResult<()> {
        if self.max_frame_size < FRAME_HEADER_SIZE {
            return Err(CodecError::InvalidConfig(format!(
                "max_frame_size {} is below the {FRAME_HEADER_SIZE}-byte frame header",
                self.max_frame_size
            )));
        }
        if self.max_frame_size > usize::from(u16::MAX) {
            return Err(CodecError::InvalidConfig(format!(
                "max_frame_size {} does not fit the 16-bit size prefix",
                self.max_frame_size
            )));
        }
        Ok(())
    }
}
