//! Two-tier envelope encryption of JSON records.
//!
//! Each record is sealed under a fresh 256-bit DEK; the DEK is then sealed
//! under the master key. Both layers use AES-256-GCM with independent random
//! nonces. The result is a [`SecureEnvelope`] whose binary fields are hex.
//!
//! ```text
//! payload ──json──► seal(DEK) ──► payload_ct / payload_nonce / payload_tag
//! DEK ────────────► seal(MK)  ──► dek_wrapped / dek_wrap_nonce / dek_wrap_tag
//! ```
//!
//! # Logging invariants
//!
//! Spans and events carry the label, byte counts, and outcome codes only.
//! Key material, DEKs, and plaintext never reach a log field.

pub mod decrypt;
pub mod encrypt;

pub use decrypt::EnvelopeDecryptor;
pub use encrypt::EnvelopeEncryptor;

use common::error::EnvelopeError;
use common::protocol::SecureEnvelope;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::{EngineContext, MasterKey};

/// Algorithm name recorded in log events.
pub const ALGORITHM: &str = "AES-256-GCM (envelope)";

/// Associated data for the payload layer.
fn label_aad<'a>(ctx: &EngineContext, label: &'a str) -> &'a [u8] {
    if ctx.binds_label() {
        label.as_bytes()
    } else {
        &[]
    }
}

/// Encrypt `payload` under a hex master key in one call.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKey`] if `master_key_hex` is not 64 hex
/// characters, or [`EnvelopeError::Unknown`] if `payload` cannot be
/// serialized.
pub fn encrypt_envelope<T>(
    label: &str,
    payload: &T,
    master_key_hex: &str,
) -> Result<SecureEnvelope, EnvelopeError>
where
    T: Serialize + ?Sized,
{
    let ctx = EngineContext::new(MasterKey::from_hex(master_key_hex)?);
    EnvelopeEncryptor::new(ctx).encrypt(label, payload)
}

/// Decrypt `envelope` under a hex master key in one call.
///
/// The key is checked before the envelope is looked at.
///
/// # Errors
///
/// See [`EnvelopeDecryptor::decrypt`]; additionally
/// [`EnvelopeError::InvalidKey`] for a malformed `master_key_hex`.
pub fn decrypt_envelope<T>(envelope: &SecureEnvelope, master_key_hex: &str) -> Result<T, EnvelopeError>
where
    T: DeserializeOwned,
{
    let ctx = EngineContext::new(MasterKey::from_hex(master_key_hex)?);
    EnvelopeDecryptor::new(ctx).decrypt(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    const K: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn vendor_round_trip() {
        let payload = json!({"amount": 1000, "currency": "USD"});
        let env = encrypt_envelope("vendor-x", &payload, K).unwrap();
        let back: Value = decrypt_envelope(&env, K).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn nested_objects_round_trip() {
        let payload = json!({"a": {"b": {"c": [1, 2, 3], "d": "test"}}});
        let env = encrypt_envelope("nested", &payload, K).unwrap();
        assert_eq!(decrypt_envelope::<Value>(&env, K).unwrap(), payload);
    }

    #[test]
    fn numbers_stay_numbers() {
        let env = encrypt_envelope("n", &json!({"val": 42}), K).unwrap();
        let back: Value = decrypt_envelope(&env, K).unwrap();
        assert!(back["val"].is_u64());
        assert_eq!(back["val"], 42);
    }

    #[test]
    fn empty_string_round_trips() {
        let payload = json!({"msg": ""});
        let env = encrypt_envelope("empty", &payload, K).unwrap();
        assert_eq!(decrypt_envelope::<Value>(&env, K).unwrap(), payload);
    }

    #[test]
    fn typed_payload_round_trips() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Transfer {
            amount: u64,
            currency: String,
        }
        let t = Transfer {
            amount: 1000,
            currency: "USD".into(),
        };
        let env = encrypt_envelope("typed", &t, K).unwrap();
        let back: Transfer = decrypt_envelope(&env, K).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn identical_inputs_produce_different_envelopes() {
        let payload = json!({"amount": 1000, "currency": "USD"});
        let a = encrypt_envelope("vendor-x", &payload, K).unwrap();
        let b = encrypt_envelope("vendor-x", &payload, K).unwrap();
        assert_ne!(a.payload_ct, b.payload_ct);
        assert_ne!(a.payload_nonce, b.payload_nonce);
    }

    #[test]
    fn short_master_key_rejected_on_both_paths() {
        let short = &K[..63];
        assert_eq!(
            encrypt_envelope("l", &json!({}), short).unwrap_err(),
            EnvelopeError::InvalidKey
        );
        let env = encrypt_envelope("l", &json!({}), K).unwrap();
        assert_eq!(
            decrypt_envelope::<Value>(&env, short).unwrap_err(),
            EnvelopeError::InvalidKey
        );
    }

    #[test]
    fn key_guard_precedes_envelope_guards() {
        let mut env = encrypt_envelope("l", &json!({}), K).unwrap();
        env.payload_nonce.clear();
        env.payload_ct.push('Z');
        assert_eq!(
            decrypt_envelope::<Value>(&env, &K[..63]).unwrap_err(),
            EnvelopeError::InvalidKey
        );
    }

    #[test]
    fn legacy_record_opens() {
        let env = encrypt_envelope("user_12345", &json!({"data": 1}), K).unwrap();
        let mut stored = serde_json::to_value(&env).unwrap();
        let map = stored.as_object_mut().unwrap();
        let label = map.remove("label").unwrap();
        map.insert("partyId".into(), label);

        let legacy: SecureEnvelope = serde_json::from_value(stored).unwrap();
        assert_eq!(legacy.label, "user_12345");
        assert_eq!(decrypt_envelope::<Value>(&legacy, K).unwrap(), json!({"data": 1}));
    }

    #[test]
    fn unbound_label_can_be_swapped() {
        let a = encrypt_envelope("alice", &json!({"data": 1}), K).unwrap();
        let mut moved = a.clone();
        moved.label = "mallory".into();
        assert_eq!(decrypt_envelope::<Value>(&moved, K).unwrap(), json!({"data": 1}));
    }

    #[test]
    fn bound_label_detects_swap() {
        let ctx = EngineContext::new(MasterKey::from_hex(K).unwrap()).with_label_binding(true);
        let enc = EnvelopeEncryptor::new(ctx.clone());
        let dec = EnvelopeDecryptor::new(ctx);

        let env = enc.encrypt("alice", &json!({"data": 1})).unwrap();
        assert_eq!(dec.decrypt::<Value>(&env).unwrap(), json!({"data": 1}));

        let mut moved = env.clone();
        moved.label = "mallory".into();
        assert_eq!(
            dec.decrypt::<Value>(&moved).unwrap_err(),
            EnvelopeError::IntegrityFailure
        );

        // A decryptor without binding cannot open a bound envelope.
        assert_eq!(
            decrypt_envelope::<Value>(&env, K).unwrap_err(),
            EnvelopeError::IntegrityFailure
        );
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EnvelopeEncryptor>();
        assert_send_sync::<EnvelopeDecryptor>();

        let ctx = EngineContext::new(MasterKey::from_hex(K).unwrap());
        let enc = EnvelopeEncryptor::new(ctx.clone());
        let dec = EnvelopeDecryptor::new(ctx);

        std::thread::scope(|s| {
            for i in 0..8 {
                let (enc, dec) = (&enc, &dec);
                s.spawn(move || {
                    let payload = json!({"worker": i});
                    let env = enc.encrypt(&format!("w{i}"), &payload).unwrap();
                    assert_eq!(dec.decrypt::<Value>(&env).unwrap(), payload);
                });
            }
        });
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("[a-z]{0,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn any_json_round_trips(payload in arb_json(), label in "[ -~]{0,16}") {
            let env = encrypt_envelope(&label, &payload, K).unwrap();
            let back: Value = decrypt_envelope(&env, K).unwrap();
            prop_assert_eq!(back, payload);
            prop_assert_eq!(env.label, label);
        }
    }
}
