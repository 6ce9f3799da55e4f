//! Secret validation and encryption-key preparation.
//!
//! A caller-supplied secret becomes the cipher key according to a
//! [`KeyPolicy`]:
//!
//! | secret length      | `Truncate`              | `Strict`         | `Derive`        |
//! |--------------------|-------------------------|------------------|-----------------|
//! | shorter than key   | `InsufficientKeyLength` | same             | same            |
//! | exactly key size   | used as-is              | used as-is       | HKDF-SHA256     |
//! | longer than key    | truncated + notice      | `OversizedKey`   | HKDF-SHA256     |
//!
//! # Security invariants
//!
//! - Key bytes are never logged or included in error messages.
//! - Every intermediate buffer holding key bytes is a [`Secret`] or is zeroized.

pub mod secret;

pub use secret::Secret;

use std::fmt;
use std::str::FromStr;

use common::EncryptorError;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::CipherKind;

/// HKDF info prefix; the cipher identifier is appended.
const DERIVE_INFO_PREFIX: &[u8] = b"encryptor/v1/";

/// How secrets whose length differs from the cipher's key size are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyPolicy {
    /// Accept oversized secrets, use their leading key-size bytes, and report a
    /// deprecation notice. Compatible with encryptors that silently truncated.
    #[default]
    Truncate,
    /// Require the secret to be exactly the key size.
    Strict,
    /// Derive a key-size key from the secret with HKDF-SHA256.
    Derive,
}

impl KeyPolicy {
    /// Canonical identifier, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            KeyPolicy::Truncate => "truncate",
            KeyPolicy::Strict => "strict",
            KeyPolicy::Derive => "derive",
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyPolicy {
    type Err = EncryptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(KeyPolicy::Truncate),
            "strict" => Ok(KeyPolicy::Strict),
            "derive" => Ok(KeyPolicy::Derive),
            other => Err(EncryptorError::UnsupportedKeyPolicy(other.to_owned())),
        }
    }
}

/// A cipher key ready for use, plus any deprecation notice raised while
/// preparing it.
#[derive(Debug)]
pub struct PreparedKey {
    /// Exactly [`CipherKind::key_len`] bytes.
    pub key: Secret,
    /// Set when the secret was accepted in a legacy-compatible way.
    pub notice: Option<String>,
}

/// Validate `secret` against `cipher`'s key size and turn it into a cipher key.
///
/// # Errors
///
/// Returns [`EncryptorError::InsufficientKeyLength`] if `secret` is shorter than
/// the key size under any policy, and [`EncryptorError::OversizedKey`] if it is
/// longer under [`KeyPolicy::Strict`].
pub fn prepare(
    secret: &[u8],
    cipher: CipherKind,
    policy: KeyPolicy,
) -> Result<PreparedKey, EncryptorError> {
    let expected = cipher.key_len();
    let actual = secret.len();
    if actual < expected {
        return Err(EncryptorError::InsufficientKeyLength { expected, actual });
    }

    match policy {
        KeyPolicy::Strict if actual > expected => {
            Err(EncryptorError::OversizedKey { expected, actual })
        }
        KeyPolicy::Strict => Ok(PreparedKey {
            key: Secret::new(secret),
            notice: None,
        }),
        KeyPolicy::Truncate => {
            let notice = (actual > expected).then(|| {
                format!(
                    "secret is {actual} bytes but {cipher} uses {expected}-byte keys; only the \
                     first {expected} bytes are used. Pass a {expected}-byte key or use the \
                     derive key policy"
                )
            });
            Ok(PreparedKey {
                key: Secret::new(&secret[..expected]),
                notice,
            })
        }
        KeyPolicy::Derive => Ok(PreparedKey {
            key: derive(secret, cipher)?,
            notice: None,
        }),
    }
}

fn derive(secret: &[u8], cipher: CipherKind) -> Result<Secret, EncryptorError> {
    let hk = Hkdf::<Sha256>::new(None, secret);
    let mut info = DERIVE_INFO_PREFIX.to_vec();
    info.extend_from_slice(cipher.as_str().as_bytes());

    // HKDF-SHA256 can expand up to 255 * 32 bytes; a key is always far below that.
    let mut okm = Zeroizing::new(vec![0u8; cipher.key_len()]);
    hk.expand(&info, okm.as_mut_slice())
        .map_err(|e| EncryptorError::EncryptionFailure(format!("key derivation: {e}")))?;
    Ok(Secret::new(okm.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIPHER: CipherKind = CipherKind::Aes256GcmSiv;

    #[test]
    fn short_secret_rejected_by_every_policy() {
        for policy in [KeyPolicy::Truncate, KeyPolicy::Strict, KeyPolicy::Derive] {
            let err = prepare(&[0u8; 31], CIPHER, policy).unwrap_err();
            assert_eq!(
                err,
                EncryptorError::InsufficientKeyLength {
                    expected: 32,
                    actual: 31
                }
            );
        }
    }

    #[test]
    fn exact_secret_used_as_is() {
        let secret: Vec<u8> = (0..32).collect();
        for policy in [KeyPolicy::Truncate, KeyPolicy::Strict] {
            let prepared = prepare(&secret, CIPHER, policy).unwrap();
            assert_eq!(prepared.key.expose(), secret.as_slice());
            assert!(prepared.notice.is_none());
        }
    }

    #[test]
    fn truncate_policy_keeps_prefix_and_warns() {
        let secret: Vec<u8> = (0..128).collect();
        let prepared = prepare(&secret, CIPHER, KeyPolicy::Truncate).unwrap();
        assert_eq!(prepared.key.expose(), &secret[..32]);
        let notice = prepared.notice.unwrap();
        assert!(notice.contains("128 bytes"), "got: {notice}");
    }

    #[test]
    fn strict_policy_rejects_oversized() {
        let err = prepare(&[1u8; 64], CIPHER, KeyPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            EncryptorError::OversizedKey {
                expected: 32,
                actual: 64
            }
        );
    }

    #[test]
    fn derive_policy_is_deterministic_and_cipher_bound() {
        let secret = [7u8; 64];
        let a = prepare(&secret, CIPHER, KeyPolicy::Derive).unwrap();
        let b = prepare(&secret, CIPHER, KeyPolicy::Derive).unwrap();
        let c = prepare(&secret, CipherKind::Aes256Gcm, KeyPolicy::Derive).unwrap();
        assert_eq!(a.key.len(), 32);
        assert_eq!(a.key.expose(), b.key.expose());
        assert_ne!(a.key.expose(), c.key.expose());
        assert_ne!(a.key.expose(), &secret[..32]);
        assert!(a.notice.is_none());
    }

    #[test]
    fn policy_identifiers_parse() {
        assert_eq!("STRICT".parse::<KeyPolicy>().unwrap(), KeyPolicy::Strict);
        assert_eq!("derive".parse::<KeyPolicy>().unwrap(), KeyPolicy::Derive);
        assert_eq!(
            "lenient".parse::<KeyPolicy>().unwrap_err(),
            EncryptorError::UnsupportedKeyPolicy("lenient".into())
        );
        assert_eq!(KeyPolicy::default(), KeyPolicy::Truncate);
    }
}
