//! [`DekBytes`]: call-scoped buffer for one envelope's DEK.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::error::EnvelopeError;
use common::protocol::KEY_LEN;
use zeroize::{Zeroize, Zeroizing};

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes. It is
/// deliberately not `Clone`.
pub struct DekBytes(Box<[u8; KEY_LEN]>);

impl DekBytes {
    /// Draw a fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut buf = Box::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(buf.as_mut_slice());
        Self(buf)
    }

    /// Take ownership of key bytes recovered from the wrap layer.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKey`] if `unwrapped` is not [`KEY_LEN`]
    /// bytes. The input buffer is wiped either way.
    pub fn from_unwrapped(unwrapped: Zeroizing<Vec<u8>>) -> Result<Self, EnvelopeError> {
        if unwrapped.len() != KEY_LEN {
            return Err(EnvelopeError::InvalidKey);
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(&unwrapped);
        Ok(Self(buf))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Drop for DekBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for DekBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("DekBytes([REDACTED])")
    }
}
