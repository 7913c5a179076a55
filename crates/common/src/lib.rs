//! Shared types, wire format, and error taxonomy for the envelope engine crates.

pub mod error;
pub mod protocol;

pub use error::{classify, EnvelopeError, FailureCategory};
pub use protocol::{ErrorResponse, SecureEnvelope};
