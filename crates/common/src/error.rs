//! Error taxonomy shared by every crate that touches sealed envelopes.

use thiserror::Error;

/// Every failure the engine can report.
///
/// The set is closed: each call path ends in success or exactly one of these
/// variants. Codes are stable and safe to persist or expose to callers:
/// - [`EnvelopeError::IntegrityFailure`] → `ER-4001`
/// - [`EnvelopeError::InvalidNonce`] → `ER-4002`
/// - [`EnvelopeError::InvalidKey`] → `ER-4003`
/// - [`EnvelopeError::CiphertextCorrupt`] → `ER-4004`
/// - [`EnvelopeError::Unknown`] → `ER-5000`
///
/// No variant carries data, so no key material or plaintext can leak through
/// `Display` or `Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EnvelopeError {
    /// Authentication tag mismatch: tampering, wrong key, or a malformed tag.
    #[error("ER-4001: integrity check failed")]
    IntegrityFailure,

    /// A nonce is not exactly 12 bytes of valid hex.
    #[error("ER-4002: invalid nonce length")]
    InvalidNonce,

    /// A key is not exactly 32 bytes (64 hex characters).
    #[error("ER-4003: invalid key length")]
    InvalidKey,

    /// A ciphertext field is not valid even-length hex.
    #[error("ER-4004: ciphertext corrupted")]
    CiphertextCorrupt,

    /// A primitive failure that fits no other category.
    #[error("ER-5000: unknown failure")]
    Unknown,
}

impl EnvelopeError {
    /// All variants, in code order.
    pub const ALL: [EnvelopeError; 5] = [
        EnvelopeError::IntegrityFailure,
        EnvelopeError::InvalidNonce,
        EnvelopeError::InvalidKey,
        EnvelopeError::CiphertextCorrupt,
        EnvelopeError::Unknown,
    ];

    /// Returns the stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EnvelopeError::IntegrityFailure => "ER-4001",
            EnvelopeError::InvalidNonce => "ER-4002",
            EnvelopeError::InvalidKey => "ER-4003",
            EnvelopeError::CiphertextCorrupt => "ER-4004",
            EnvelopeError::Unknown => "ER-5000",
        }
    }

    /// Short description safe to show to callers.
    pub fn description(&self) -> &'static str {
        match self {
            EnvelopeError::IntegrityFailure => "integrity check failed",
            EnvelopeError::InvalidNonce => "invalid nonce length",
            EnvelopeError::InvalidKey => "invalid key length",
            EnvelopeError::CiphertextCorrupt => "ciphertext corrupted",
            EnvelopeError::Unknown => "unknown failure",
        }
    }

    /// Parse a stable code back into its variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }
}

/// What went wrong inside a primitive call, before it is classified.
///
/// The cipher layer reports one of these; [`classify`] turns it into the
/// caller-visible [`EnvelopeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The AEAD tag did not verify.
    TagMismatch,
    /// The tag argument had the wrong length.
    MalformedTag,
    /// The nonce argument had the wrong length.
    MalformedNonce,
    /// The key argument had the wrong length.
    MalformedKey,
    /// Anything else the primitive reported.
    Other,
}

/// Map a primitive failure category onto exactly one error kind.
///
/// A malformed tag is indistinguishable from tampering and gets the same
/// classification as a failed verification.
pub fn classify(category: FailureCategory) -> EnvelopeError {
    match category {
        FailureCategory::TagMismatch | FailureCategory::MalformedTag => {
            EnvelopeError::IntegrityFailure
        }
        FailureCategory::MalformedNonce => EnvelopeError::InvalidNonce,
        FailureCategory::MalformedKey => EnvelopeError::InvalidKey,
        FailureCategory::Other => EnvelopeError::Unknown,
    }
}

impl From<FailureCategory> for EnvelopeError {
    fn from(category: FailureCategory) -> Self {
        classify(category)
    }
}
