//! AEAD cipher primitives keyed by a caller-supplied IV.
//!
//! Both supported modes take a 256-bit key and a 96-bit nonce, which serves as
//! the message IV. The IV must be fresh for every encryption; callers draw it
//! from a [`RandomSource`](super::random::RandomSource).
//!
//! **AES-256-GCM must never see a repeated IV under the same key.** Reuse breaks
//! both confidentiality and authentication. AES-256-GCM-SIV degrades gracefully
//! (it only reveals equality of repeated plaintexts), which is why it is the
//! default.

use std::fmt;
use std::str::FromStr;

use aes_gcm::Aes256Gcm;
use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv,
};
use common::EncryptorError;
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the nonce used as IV (12 bytes = 96 bits).
pub const IV_LEN: usize = 12;

/// Errors produced by the cipher layer.
///
/// These never leave the crate; the encryptor folds them into
/// [`EncryptorError::InvalidMessage`] on the decrypt path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length for the cipher.
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// The IV is the wrong length for the cipher.
    #[error("invalid IV length: expected {IV_LEN} bytes")]
    InvalidIvLength,

    /// Encryption failed, or decryption failed authentication.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Supported cipher modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherKind {
    /// AES-256-GCM-SIV (RFC 8452), nonce-misuse-resistant.
    #[default]
    Aes256GcmSiv,
    /// AES-256-GCM.
    Aes256Gcm,
}

impl CipherKind {
    /// Canonical identifier, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            CipherKind::Aes256GcmSiv => "aes-256-gcm-siv",
            CipherKind::Aes256Gcm => "aes-256-gcm",
        }
    }

    /// Key size in bytes.
    pub fn key_len(self) -> usize {
        KEY_LEN
    }

    /// IV size in bytes.
    pub fn iv_len(self) -> usize {
        IV_LEN
    }

    /// Encrypt `plaintext` under `key` and `iv`, returning ciphertext + tag.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] or [`CipherError::InvalidIvLength`]
    /// on mis-sized inputs, [`CipherError::AeadFailure`] on an internal AEAD error.
    pub fn encrypt(self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        check_iv(iv)?;
        match self {
            CipherKind::Aes256GcmSiv => build::<Aes256GcmSiv>(key)?
                .encrypt(iv.into(), plaintext)
                .map_err(|_| CipherError::AeadFailure),
            CipherKind::Aes256Gcm => build::<Aes256Gcm>(key)?
                .encrypt(iv.into(), plaintext)
                .map_err(|_| CipherError::AeadFailure),
        }
    }

    /// Decrypt and authenticate `ciphertext` under `key` and `iv`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] if authentication fails (wrong key,
    /// wrong IV, or tampered data), or a length error on mis-sized inputs.
    pub fn decrypt(self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        check_iv(iv)?;
        match self {
            CipherKind::Aes256GcmSiv => build::<Aes256GcmSiv>(key)?
                .decrypt(iv.into(), ciphertext)
                .map_err(|_| CipherError::AeadFailure),
            CipherKind::Aes256Gcm => build::<Aes256Gcm>(key)?
                .decrypt(iv.into(), ciphertext)
                .map_err(|_| CipherError::AeadFailure),
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherKind {
    type Err = EncryptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-256-gcm-siv" => Ok(CipherKind::Aes256GcmSiv),
            "aes-256-gcm" => Ok(CipherKind::Aes256Gcm),
            other => Err(EncryptorError::UnsupportedCipher(other.to_owned())),
        }
    }
}

fn check_iv(iv: &[u8]) -> Result<(), CipherError> {
    if iv.len() != IV_LEN {
        return Err(CipherError::InvalidIvLength);
    }
    Ok(())
}

fn build<C: KeyInit>(key: &[u8]) -> Result<C, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    C::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [CipherKind; 2] = [CipherKind::Aes256GcmSiv, CipherKind::Aes256Gcm];

    fn key(fill: u8) -> Vec<u8> {
        vec![fill; KEY_LEN]
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        for kind in KINDS {
            let iv = [3u8; IV_LEN];
            let ct = kind.encrypt(&key(1), &iv, b"123-45-6789").unwrap();
            assert_ne!(&ct[..], b"123-45-6789");
            assert_eq!(kind.decrypt(&key(1), &iv, &ct).unwrap(), b"123-45-6789");
        }
    }

    #[test]
    fn wrong_key_fails_decryption() {
        for kind in KINDS {
            let iv = [0u8; IV_LEN];
            let ct = kind.encrypt(&key(1), &iv, b"secret").unwrap();
            assert_eq!(
                kind.decrypt(&key(2), &iv, &ct).unwrap_err(),
                CipherError::AeadFailure
            );
        }
    }

    #[test]
    fn wrong_iv_fails_decryption() {
        for kind in KINDS {
            let ct = kind.encrypt(&key(1), &[0u8; IV_LEN], b"secret").unwrap();
            assert!(kind.decrypt(&key(1), &[1u8; IV_LEN], &ct).is_err());
        }
    }

    #[test]
    fn invalid_lengths_rejected() {
        assert_eq!(
            CipherKind::default()
                .encrypt(&[0u8; 16], &[0u8; IV_LEN], b"x")
                .unwrap_err(),
            CipherError::InvalidKeyLength
        );
        assert_eq!(
            CipherKind::default()
                .encrypt(&key(0), &[0u8; 16], b"x")
                .unwrap_err(),
            CipherError::InvalidIvLength
        );
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        for kind in KINDS {
            let iv = [5u8; IV_LEN];
            let mut ct = kind.encrypt(&key(9), &iv, b"tamper me").unwrap();
            ct[0] ^= 0xFF;
            assert!(kind.decrypt(&key(9), &iv, &ct).is_err());
        }
    }

    #[test]
    fn modes_are_not_interchangeable() {
        let iv = [7u8; IV_LEN];
        let ct = CipherKind::Aes256GcmSiv
            .encrypt(&key(4), &iv, b"payload")
            .unwrap();
        assert!(CipherKind::Aes256Gcm.decrypt(&key(4), &iv, &ct).is_err());
    }

    #[test]
    fn identifiers_parse() {
        assert_eq!(
            "AES-256-GCM".parse::<CipherKind>().unwrap(),
            CipherKind::Aes256Gcm
        );
        for kind in KINDS {
            assert_eq!(kind.as_str().parse::<CipherKind>().unwrap(), kind);
        }
        assert_eq!(
            "aes-128-cbc".parse::<CipherKind>().unwrap_err(),
            EncryptorError::UnsupportedCipher("aes-128-cbc".into())
        );
    }
}
