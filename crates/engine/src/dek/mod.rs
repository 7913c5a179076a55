//! Per-envelope Data Encryption Keys.
//!
//! # Lifecycle
//!
//! 1. The encryptor calls [`DekBytes::generate`] once per envelope; the key
//!    comes straight from the OS CSPRNG and is never derived from any input.
//! 2. The decryptor rebuilds the key with [`DekBytes::from_unwrapped`] after the
//!    wrap layer has verified.
//! 3. The key is dropped when the call returns, on every exit path, and its
//!    memory is overwritten with zeroes.
//!
//! # Security invariants
//!
//! - A DEK is **never** logged, cloned, or stored beyond the call that owns it.
//! - `Debug` output is redacted.

pub mod bytes;

pub use bytes::DekBytes;
