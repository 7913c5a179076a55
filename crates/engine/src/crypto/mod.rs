//! AES-256-GCM primitives.
//!
//! Free of configuration, logging, and envelope concerns. Every failure is
//! already classified into a [`common::EnvelopeError`] when it leaves this
//! module.

pub mod cipher;

pub use cipher::{open, open_with_aad, seal, seal_with_aad, SealedBox};
