//! Injectable source of random bytes for IV generation.

use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};
use common::EncryptorError;

/// Provider of cryptographically secure random bytes.
///
/// Production code uses [`OsRandom`]; tests substitute a deterministic source.
/// Implementations must be safe to call from many threads at once.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::RandomSource`] if no entropy is available.
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), EncryptorError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), EncryptorError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|_| EncryptorError::RandomSource)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for std::sync::Arc<R> {
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<(), EncryptorError> {
        (**self).fill_bytes(buf)
    }
}
