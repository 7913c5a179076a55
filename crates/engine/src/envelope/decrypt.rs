//! [`EnvelopeDecryptor`]: validate, unwrap, decrypt, and parse a
//! [`SecureEnvelope`].
//!
//! # Guard order
//!
//! Each stage is terminal on failure and no cryptographic work happens until
//! every shape check has passed:
//!
//! 1. master key is 32 bytes → else `ER-4003` (enforced by [`MasterKey`])
//! 2. both nonces are 12 bytes of hex → else `ER-4002`
//! 3. both tags are 16 bytes of hex → else `ER-4001`
//! 4. both ciphertexts are even-length hex → else `ER-4004`
//! 5. unwrap the DEK under the master key
//! 6. open the payload under the DEK
//! 7. parse the plaintext as JSON → else `ER-5000`
//!
//! [`MasterKey`]: crate::context::MasterKey

use common::error::EnvelopeError;
use common::protocol::{SecureEnvelope, KEY_LEN, NONCE_LEN, TAG_LEN};
use serde::de::DeserializeOwned;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::label_aad;
use crate::context::EngineContext;
use crate::crypto::{open, open_with_aad};
use crate::dek::DekBytes;

/// Opens [`SecureEnvelope`]s sealed under one master key.
///
/// Holds no mutable state; share one instance across threads freely.
#[derive(Clone, Debug)]
pub struct EnvelopeDecryptor {
    ctx: EngineContext,
}

/// Binary fields of an envelope that passed every shape check.
struct DecodedEnvelope {
    payload_nonce: [u8; NONCE_LEN],
    payload_tag: [u8; TAG_LEN],
    payload_ct: Vec<u8>,
    dek_wrap_nonce: [u8; NONCE_LEN],
    dek_wrap_tag: [u8; TAG_LEN],
    dek_wrapped: Vec<u8>,
}

impl EnvelopeDecryptor {
    /// Create a decryptor bound to `ctx`.
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Decrypt `envelope` and deserialize the payload as `T`.
    ///
    /// Returns exactly the value that was encrypted, or an error. Never
    /// returns unauthenticated or partially decrypted data.
    ///
    /// # Errors
    ///
    /// Returns the [`EnvelopeError`] for the first guard stage that fails.
    pub fn decrypt<T>(&self, envelope: &SecureEnvelope) -> Result<T, EnvelopeError>
    where
        T: DeserializeOwned,
    {
        let span = info_span!(
            "envelope.decrypt",
            op_id = %Uuid::new_v4(),
            label = %envelope.label
        );
        let _guard = span.enter();

        let result = self.open_record(envelope);
        match &result {
            Ok(_) => info!("integrity check passed"),
            Err(e) => warn!(code = e.code(), "decryption rejected"),
        }
        result
    }

    fn open_record<T>(&self, envelope: &SecureEnvelope) -> Result<T, EnvelopeError>
    where
        T: DeserializeOwned,
    {
        if self.ctx.master_key().as_bytes().len() != KEY_LEN {
            return Err(EnvelopeError::InvalidKey);
        }
        let decoded = validate(envelope)?;

        debug!("unwrapping DEK");
        let dek = DekBytes::from_unwrapped(open(
            &decoded.dek_wrapped,
            &decoded.dek_wrap_nonce,
            &decoded.dek_wrap_tag,
            self.ctx.master_key().as_bytes(),
        )?)?;

        debug!(ciphertext_bytes = decoded.payload_ct.len(), "decrypting payload");
        let plaintext = open_with_aad(
            &decoded.payload_ct,
            &decoded.payload_nonce,
            &decoded.payload_tag,
            dek.as_bytes(),
            label_aad(&self.ctx, &envelope.label),
        )?;
        drop(dek);

        serde_json::from_slice(&plaintext).map_err(|_| EnvelopeError::Unknown)
    }
}

/// Run guard stages 2–4 and decode every binary field.
fn validate(envelope: &SecureEnvelope) -> Result<DecodedEnvelope, EnvelopeError> {
    let payload_nonce = decode_fixed::<NONCE_LEN>(&envelope.payload_nonce);
    let dek_wrap_nonce = decode_fixed::<NONCE_LEN>(&envelope.dek_wrap_nonce);
    let (Some(payload_nonce), Some(dek_wrap_nonce)) = (payload_nonce, dek_wrap_nonce) else {
        return Err(EnvelopeError::InvalidNonce);
    };

    let payload_tag = decode_fixed::<TAG_LEN>(&envelope.payload_tag);
    let dek_wrap_tag = decode_fixed::<TAG_LEN>(&envelope.dek_wrap_tag);
    let (Some(payload_tag), Some(dek_wrap_tag)) = (payload_tag, dek_wrap_tag) else {
        return Err(EnvelopeError::IntegrityFailure);
    };

    let payload_ct = hex::decode(&envelope.payload_ct);
    let dek_wrapped = hex::decode(&envelope.dek_wrapped);
    let (Ok(payload_ct), Ok(dek_wrapped)) = (payload_ct, dek_wrapped) else {
        return Err(EnvelopeError::CiphertextCorrupt);
    };

    Ok(DecodedEnvelope {
        payload_nonce,
        payload_tag,
        payload_ct,
        dek_wrap_nonce,
        dek_wrap_tag,
        dek_wrapped,
    })
}

/// Decode a hex string that must be exactly `N` bytes.
fn decode_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    if s.len() != N * 2 {
        return None;
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(s, &mut out).ok()?;
    Some(out)
}
