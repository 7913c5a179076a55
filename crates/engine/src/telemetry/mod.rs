//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No key material or plaintext** may appear in any span attribute or log
//!   field. Labels, byte counts, and error codes only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init_telemetry;
