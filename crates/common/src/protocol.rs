//! Wire and storage types for sealed records.
//!
//! Every binary field is carried as a hex string. The engine emits lowercase
//! hex; uppercase is accepted on input.

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// Byte length of an AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce.
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Hex length of a master key supplied through configuration.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Hex length of an encoded nonce.
pub const NONCE_HEX_LEN: usize = NONCE_LEN * 2;

/// Hex length of an encoded tag.
pub const TAG_HEX_LEN: usize = TAG_LEN * 2;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A JSON record sealed under a per-record DEK, with the DEK wrapped under
/// the master key.
///
/// `label` is plaintext and, unless label binding is enabled, is not covered
/// by either authentication tag. Treat it as a lookup hint only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureEnvelope {
    /// Caller-chosen lookup label. Records from older stores used `partyId`.
    #[serde(alias = "partyId")]
    pub label: String,
    /// Nonce for the payload layer (24 hex chars).
    pub payload_nonce: String,
    /// Payload ciphertext, same byte length as the serialized JSON.
    pub payload_ct: String,
    /// Payload authentication tag (32 hex chars).
    pub payload_tag: String,
    /// DEK encrypted under the master key (64 hex chars).
    pub dek_wrapped: String,
    /// Nonce for the key-wrap layer (24 hex chars).
    pub dek_wrap_nonce: String,
    /// Key-wrap authentication tag (32 hex chars).
    pub dek_wrap_tag: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body for callers that surface engine failures as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code (e.g. `"ER-4001"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<EnvelopeError> for ErrorResponse {
    fn from(e: EnvelopeError) -> Self {
        Self::new(e.code(), e.description())
    }
}
