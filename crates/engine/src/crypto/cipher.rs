//! AES-256-GCM seal and open with detached tags.
//!
//! **Every call to [`seal`] draws a fresh 96-bit nonce from the OS CSPRNG.**
//! Nonces are never caller-supplied. GCM nonce reuse under one key breaks
//! both confidentiality and authentication.

use aes_gcm::{
    aead::{rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Nonce, Tag,
};
use common::error::{EnvelopeError, FailureCategory};
use common::protocol::{KEY_LEN, NONCE_LEN, TAG_LEN};
use zeroize::Zeroizing;

/// Output of a single [`seal`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBox {
    /// Ciphertext, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Nonce drawn for this call.
    pub nonce: [u8; NONCE_LEN],
    /// Authentication tag over ciphertext, nonce, and key.
    pub tag: [u8; TAG_LEN],
}

impl SealedBox {
    /// Lowercase hex of the ciphertext.
    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }

    /// Lowercase hex of the nonce.
    pub fn nonce_hex(&self) -> String {
        hex::encode(self.nonce)
    }

    /// Lowercase hex of the tag.
    pub fn tag_hex(&self) -> String {
        hex::encode(self.tag)
    }
}

/// Encrypt `plaintext` under `key` with no associated data.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKey`] if `key` is not [`KEY_LEN`] bytes.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<SealedBox, EnvelopeError> {
    seal_with_aad(plaintext, key, &[])
}

/// Encrypt `plaintext` under `key`, binding `aad` into the tag.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKey`] if `key` is not [`KEY_LEN`] bytes and
/// [`EnvelopeError::Unknown`] if the AEAD rejects the input (plaintext too
/// large for GCM).
pub fn seal_with_aad(plaintext: &[u8], key: &[u8], aad: &[u8]) -> Result<SealedBox, EnvelopeError> {
    let cipher = build_cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    // Holds plaintext until encrypted in place; wiped if encryption fails.
    let mut buffer = Zeroizing::new(plaintext.to_vec());
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), aad, buffer.as_mut_slice())
        .map_err(|_| EnvelopeError::from(FailureCategory::Other))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(SealedBox {
        ciphertext: std::mem::take(&mut *buffer),
        nonce,
        tag: tag_bytes,
    })
}

/// Decrypt and verify `ciphertext` with no associated data.
///
/// # Errors
///
/// See [`open_with_aad`].
pub fn open(
    ciphertext: &[u8],
    nonce: &[u8],
    tag: &[u8],
    key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
    open_with_aad(ciphertext, nonce, tag, key, &[])
}

/// Decrypt and verify `ciphertext`, checking that `aad` matches what was sealed.
///
/// Argument shapes are checked before any verification. Plaintext is only
/// returned once the tag has verified; on failure no bytes are released.
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKey`] if `key` is not [`KEY_LEN`] bytes.
/// - [`EnvelopeError::InvalidNonce`] if `nonce` is not [`NONCE_LEN`] bytes.
/// - [`EnvelopeError::IntegrityFailure`] if `tag` is not [`TAG_LEN`] bytes or
///   does not verify.
pub fn open_with_aad(
    ciphertext: &[u8],
    nonce: &[u8],
    tag: &[u8],
    key: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
    let cipher = build_cipher(key)?;
    if nonce.len() != NONCE_LEN {
        return Err(FailureCategory::MalformedNonce.into());
    }
    if tag.len() != TAG_LEN {
        return Err(FailureCategory::MalformedTag.into());
    }

    // Dropped (and wiped) on the error path.
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            aad,
            buffer.as_mut_slice(),
            Tag::from_slice(tag),
        )
        .map_err(|_| EnvelopeError::from(FailureCategory::TagMismatch))?;

    Ok(buffer)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, EnvelopeError> {
    if key.len() != KEY_LEN {
        return Err(FailureCategory::MalformedKey.into());
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| FailureCategory::MalformedKey.into())
}
