//! [`EnvelopeEncryptor`]: seal a JSON payload under a fresh DEK and wrap the
//! DEK under the master key.

use common::error::EnvelopeError;
use common::protocol::SecureEnvelope;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{label_aad, ALGORITHM};
use crate::context::EngineContext;
use crate::crypto::{seal, seal_with_aad};
use crate::dek::DekBytes;

/// Produces [`SecureEnvelope`]s under one master key.
///
/// Holds no mutable state; share one instance across threads freely.
#[derive(Clone, Debug)]
pub struct EnvelopeEncryptor {
    ctx: EngineContext,
}

impl EnvelopeEncryptor {
    /// Create an encryptor bound to `ctx`.
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Serialize `payload` to JSON and seal it into a new envelope.
    ///
    /// `label` is copied into the envelope in the clear.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Unknown`] if `payload` cannot be serialized to
    /// JSON (for example a map with non-string keys).
    pub fn encrypt<T>(&self, label: &str, payload: &T) -> Result<SecureEnvelope, EnvelopeError>
    where
        T: Serialize + ?Sized,
    {
        let span = info_span!("envelope.encrypt", op_id = %Uuid::new_v4(), label = %label);
        let _guard = span.enter();

        let result = self.seal_record(label, payload);
        match &result {
            Ok(_) => info!(algorithm = ALGORITHM, "record encrypted"),
            Err(e) => warn!(code = e.code(), "encryption failed"),
        }
        result
    }

    fn seal_record<T>(&self, label: &str, payload: &T) -> Result<SecureEnvelope, EnvelopeError>
    where
        T: Serialize + ?Sized,
    {
        let payload_bytes = Zeroizing::new(
            serde_json::to_vec(payload).map_err(|_| EnvelopeError::Unknown)?,
        );

        // Dropped, and zeroed, when this function returns.
        let dek = DekBytes::generate();

        let payload_box = seal_with_aad(
            &payload_bytes,
            dek.as_bytes(),
            label_aad(&self.ctx, label),
        )?;
        let wrap_box = seal(dek.as_bytes(), self.ctx.master_key().as_bytes())?;

        debug!(
            payload_bytes = payload_bytes.len(),
            label_bound = self.ctx.binds_label(),
            "payload sealed and DEK wrapped"
        );

        Ok(SecureEnvelope {
            label: label.to_owned(),
            payload_nonce: payload_box.nonce_hex(),
            payload_ct: payload_box.ciphertext_hex(),
            payload_tag: payload_box.tag_hex(),
            dek_wrapped: wrap_box.ciphertext_hex(),
            dek_wrap_nonce: wrap_box.nonce_hex(),
            dek_wrap_tag: wrap_box.tag_hex(),
        })
    }
}
