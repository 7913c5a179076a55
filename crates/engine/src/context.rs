//! [`EngineContext`]: the master key and options threaded into the encryptor
//! and decryptor.
//!
//! There is no process-wide key. Each context owns its key, so tests and
//! callers can run several contexts side by side.

use std::sync::Arc;

use common::error::EnvelopeError;
use common::protocol::{KEY_HEX_LEN, KEY_LEN};
use zeroize::Zeroize;

use crate::config::Config;

/// The long-lived key-encryption key.
///
/// Zeroed on drop and redacted from `Debug`.
pub struct MasterKey(Box<[u8; KEY_LEN]>);

impl MasterKey {
    /// Parse a master key from its 64-character hex form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKey`] if `hex_key` is not exactly
    /// 64 characters or is not valid hex.
    pub fn from_hex(hex_key: &str) -> Result<Self, EnvelopeError> {
        if hex_key.len() != KEY_HEX_LEN {
            return Err(EnvelopeError::InvalidKey);
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        if hex::decode_to_slice(hex_key, buf.as_mut_slice()).is_err() {
            buf.zeroize();
            return Err(EnvelopeError::InvalidKey);
        }
        Ok(Self(buf))
    }

    /// Build a master key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKey`] if `bytes` is not [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() != KEY_LEN {
            return Err(EnvelopeError::InvalidKey);
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Read-only state shared by [`EnvelopeEncryptor`] and [`EnvelopeDecryptor`].
///
/// Cheap to clone; the key sits behind an `Arc` and is never mutated.
///
/// [`EnvelopeEncryptor`]: crate::envelope::EnvelopeEncryptor
/// [`EnvelopeDecryptor`]: crate::envelope::EnvelopeDecryptor
#[derive(Clone, Debug)]
pub struct EngineContext {
    master_key: Arc<MasterKey>,
    bind_label: bool,
}

impl EngineContext {
    /// Create a context with label binding disabled.
    pub fn new(master_key: MasterKey) -> Self {
        Self {
            master_key: Arc::new(master_key),
            bind_label: false,
        }
    }

    /// Enable or disable binding the envelope label into the payload tag.
    ///
    /// Envelopes sealed with binding on only open with binding on, and the
    /// other way round.
    pub fn with_label_binding(mut self, bind_label: bool) -> Self {
        self.bind_label = bind_label;
        self
    }

    /// Build a context from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKey`] if `MASTER_KEY` is absent or malformed.
    pub fn from_config(cfg: &Config) -> Result<Self, EnvelopeError> {
        let hex_key = cfg.master_key.as_deref().ok_or(EnvelopeError::InvalidKey)?;
        let key = MasterKey::from_hex(hex_key.trim())?;
        Ok(Self::new(key).with_label_binding(cfg.bind_label))
    }

    /// Borrow the master key.
    pub fn master_key(&self) -> &MasterKey {
        &self.master_key
    }

    /// Whether the label is bound as associated data.
    pub fn binds_label(&self) -> bool {
        self.bind_label
    }
}
