//! HMAC tags over the encoded message text.

use std::fmt;
use std::str::FromStr;

use common::EncryptorError;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

/// Digest used by the HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MacDigest {
    #[default]
    Sha256,
    Sha512,
}

impl MacDigest {
    /// Canonical identifier, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            MacDigest::Sha256 => "sha256",
            MacDigest::Sha512 => "sha512",
        }
    }

    /// Tag length in bytes.
    pub fn tag_len(self) -> usize {
        match self {
            MacDigest::Sha256 => 32,
            MacDigest::Sha512 => 64,
        }
    }

    /// Compute the HMAC of `data` under `key`.
    pub fn sign(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            MacDigest::Sha256 => tag::<Hmac<Sha256>>(key, data),
            MacDigest::Sha512 => tag::<Hmac<Sha512>>(key, data),
        }
    }

    /// Returns `true` if `tag` is the HMAC of `data` under `key`.
    ///
    /// The length check is not constant-time (tag length is public); the byte
    /// comparison is.
    pub fn verify(self, key: &[u8], data: &[u8], tag: &[u8]) -> bool {
        if tag.len() != self.tag_len() {
            return false;
        }
        let expected = self.sign(key, data);
        expected.ct_eq(tag).into()
    }
}

impl fmt::Display for MacDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MacDigest {
    type Err = EncryptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(MacDigest::Sha256),
            "sha512" | "sha-512" => Ok(MacDigest::Sha512),
            other => Err(EncryptorError::UnsupportedDigest(other.to_owned())),
        }
    }
}

/// HMAC accepts keys of any length: shorter keys are padded and longer ones are
/// hashed, so `new_from_slice` never fails here.
fn tag<M: Mac + hmac::digest::KeyInit>(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC keys have no length limit"));
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
