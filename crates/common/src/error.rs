//! Error taxonomy shared by the encryptor and its callers.

use thiserror::Error;

/// Every failure the message encryptor can report.
///
/// Decryption and verification failures all collapse into
/// [`EncryptorError::InvalidMessage`]: a malformed envelope, bad base64, a
/// failed authentication tag, a MAC mismatch and an undecodable plaintext are
/// indistinguishable to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncryptorError {
    /// The secret is shorter than the cipher's key size.
    #[error("insufficient key length: expected at least {expected} bytes, got {actual}")]
    InsufficientKeyLength {
        /// Key size required by the cipher.
        expected: usize,
        /// Length of the secret that was supplied.
        actual: usize,
    },

    /// The secret is longer than the cipher's key size and the key policy is strict.
    #[error("oversized key: expected exactly {expected} bytes, got {actual}")]
    OversizedKey {
        /// Key size required by the cipher.
        expected: usize,
        /// Length of the secret that was supplied.
        actual: usize,
    },

    /// The message could not be decrypted or verified.
    #[error("invalid message")]
    InvalidMessage,

    /// The value passed to an encrypt operation could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The cipher identifier is not recognised.
    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    /// The MAC digest identifier is not recognised.
    #[error("unsupported digest: {0}")]
    UnsupportedDigest(String),

    /// The key policy identifier is not recognised.
    #[error("unsupported key policy: {0}")]
    UnsupportedKeyPolicy(String),

    /// The cipher refused to encrypt the payload.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// The random-byte provider could not produce an IV.
    #[error("random source failure")]
    RandomSource,
}

impl EncryptorError {
    /// Returns `true` for errors raised while constructing an encryptor.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            EncryptorError::InsufficientKeyLength { .. }
                | EncryptorError::OversizedKey { .. }
                | EncryptorError::UnsupportedCipher(_)
                | EncryptorError::UnsupportedDigest(_)
                | EncryptorError::UnsupportedKeyPolicy(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_message_display_is_opaque() {
        assert_eq!(EncryptorError::InvalidMessage.to_string(), "invalid message");
    }

    #[test]
    fn key_length_display_includes_sizes() {
        let e = EncryptorError::InsufficientKeyLength {
            expected: 32,
            actual: 16,
        };
        let s = e.to_string();
        assert!(s.contains("32"));
        assert!(s.contains("16"));
    }

    #[test]
    fn construction_errors_classified() {
        assert!(EncryptorError::InsufficientKeyLength {
            expected: 32,
            actual: 1
        }
        .is_construction_error());
        assert!(EncryptorError::UnsupportedCipher("des".into()).is_construction_error());
        assert!(EncryptorError::UnsupportedKeyPolicy("lenient".into()).is_construction_error());
        assert!(!EncryptorError::InvalidMessage.is_construction_error());
        assert!(!EncryptorError::Serialization("x".into()).is_construction_error());
    }
}
