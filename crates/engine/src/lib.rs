//! Envelope encryption engine for JSON records at rest.
//!
//! Each record is sealed with AES-256-GCM under a fresh, single-use Data
//! Encryption Key; the DEK is sealed under one long-lived master key. Every
//! failure is reported as one of the five [`EnvelopeError`] kinds.
//!
//! ```no_run
//! use engine::{EngineContext, EnvelopeDecryptor, EnvelopeEncryptor, MasterKey};
//! use serde_json::{json, Value};
//!
//! # fn main() -> Result<(), engine::EnvelopeError> {
//! let ctx = EngineContext::new(MasterKey::from_hex(&"ab".repeat(32))?);
//! let envelope = EnvelopeEncryptor::new(ctx.clone())
//!     .encrypt("vendor-x", &json!({"amount": 1000, "currency": "USD"}))?;
//! let payload: Value = EnvelopeDecryptor::new(ctx).decrypt(&envelope)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod crypto;
pub mod dek;
pub mod envelope;
pub mod telemetry;

pub use common::{EnvelopeError, ErrorResponse, SecureEnvelope};
pub use config::Config;
pub use context::{EngineContext, MasterKey};
pub use envelope::{decrypt_envelope, encrypt_envelope, EnvelopeDecryptor, EnvelopeEncryptor};
