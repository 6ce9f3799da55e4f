//! Textual wire format for encrypted and signed messages.
//!
//! ```text
//! encrypt-only:  B64(ciphertext)--B64(iv)
//! signed:        B64(ciphertext)--B64(iv)--B64(mac)
//! ```
//!
//! Every segment uses the standard, padded base64 alphabet (`A-Z a-z 0-9 + /`
//! with `=` padding) for both encoding and decoding. The alphabet contains no
//! `-`, so the separator can never appear inside a segment. Unpadded segments
//! are rejected.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::EncryptorError;

/// Delimiter joining the base64 segments of a message.
pub const SEPARATOR: &str = "--";

/// Base64 engine used for every segment, on both the encode and decode paths.
pub const BASE64: base64::engine::GeneralPurpose = STANDARD;

/// Encode raw bytes as a single message segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode a single message segment.
///
/// # Errors
///
/// Returns [`EncryptorError::InvalidMessage`] if the segment is empty or is not
/// canonical padded base64.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, EncryptorError> {
    if segment.is_empty() {
        return Err(EncryptorError::InvalidMessage);
    }
    BASE64
        .decode(segment)
        .map_err(|_| EncryptorError::InvalidMessage)
}

/// Split `message` on [`SEPARATOR`] into exactly `N` non-empty segments.
fn split_exact<const N: usize>(message: &str) -> Result<[&str; N], EncryptorError> {
    let mut parts = [""; N];
    let mut iter = message.split(SEPARATOR);
    for slot in parts.iter_mut() {
        match iter.next() {
            Some(p) if !p.is_empty() => *slot = p,
            _ => return Err(EncryptorError::InvalidMessage),
        }
    }
    if iter.next().is_some() {
        return Err(EncryptorError::InvalidMessage);
    }
    Ok(parts)
}

/// A parsed encrypt-only message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    /// Raw ciphertext bytes, including any authentication tag.
    pub ciphertext: Vec<u8>,
    /// Raw IV bytes.
    pub iv: Vec<u8>,
}

impl EncryptedMessage {
    /// Encode this message to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}{SEPARATOR}{}",
            encode_segment(&self.ciphertext),
            encode_segment(&self.iv),
        )
    }

    /// Parse an encrypt-only message string.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidMessage`] unless the string has exactly
    /// two non-empty, decodable segments.
    pub fn parse(s: &str) -> Result<Self, EncryptorError> {
        let [ciphertext, iv] = split_exact::<2>(s)?;
        Ok(Self {
            ciphertext: decode_segment(ciphertext)?,
            iv: decode_segment(iv)?,
        })
    }
}

/// A parsed signed message.
///
/// The MAC covers `inner` exactly as transmitted, so it is kept in its encoded
/// form rather than decoded into an [`EncryptedMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage<'a> {
    /// The encrypt-only message text the MAC was computed over.
    pub inner: &'a str,
    /// Raw MAC bytes.
    pub mac: Vec<u8>,
}

impl<'a> SignedMessage<'a> {
    /// Join an encoded inner message and a raw MAC into the signed form.
    pub fn compose(inner: &str, mac: &[u8]) -> String {
        format!("{inner}{SEPARATOR}{}", encode_segment(mac))
    }

    /// Parse a signed message string.
    ///
    /// Only the MAC segment is decoded here; the inner segments are decoded
    /// after the MAC has been verified.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidMessage`] unless the string has exactly
    /// three non-empty segments and the MAC segment is decodable.
    pub fn parse(s: &'a str) -> Result<Self, EncryptorError> {
        let [ciphertext, iv, mac] = split_exact::<3>(s)?;
        let inner_len = ciphertext.len() + SEPARATOR.len() + iv.len();
        Ok(Self {
            inner: &s[..inner_len],
            mac: decode_segment(mac)?,
        })
    }
}
