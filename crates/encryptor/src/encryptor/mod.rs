//! [`MessageEncryptor`]: serialize, encrypt, sign, verify, and decrypt messages.
//!
//! # Message format
//!
//! ```text
//! encrypt:          B64(ciphertext)--B64(iv)
//! encrypt_and_sign: B64(ciphertext)--B64(iv)--B64(hmac)
//! ```
//!
//! The HMAC covers the encoded `B64(ciphertext)--B64(iv)` text, so any change
//! to the transmitted characters is caught before decryption is attempted.
//!
//! # Failure model
//!
//! Every decrypt-path failure is reported as [`EncryptorError::InvalidMessage`],
//! whatever stage it happened at. Nothing on this path logs the stage either.

pub mod builder;

pub use builder::EncryptorBuilder;

use common::protocol::{EncryptedMessage, SignedMessage};
use common::{EncryptorError, Value};

use crate::crypto::{CipherKind, MacDigest, OsRandom, RandomSource};
use crate::key::Secret;
use crate::serializer::{JsonSerializer, Serializer};

/// Symmetric authenticated message encryptor.
///
/// Holds its keys and collaborators immutably after construction; every
/// operation takes `&self`, so one instance can be shared across threads.
pub struct MessageEncryptor<S = JsonSerializer, R = OsRandom> {
    cipher: CipherKind,
    digest: MacDigest,
    key: Secret,
    sign_key: Secret,
    serializer: S,
    random: R,
}

impl MessageEncryptor {
    /// Create an encryptor with the default cipher, digest, key policy,
    /// serializer and random source.
    ///
    /// The sign secret defaults to `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InsufficientKeyLength`] if `secret` is shorter
    /// than the cipher's key size.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, EncryptorError> {
        Self::builder(secret).build()
    }

    /// Start configuring an encryptor for `secret`.
    pub fn builder(secret: impl AsRef<[u8]>) -> EncryptorBuilder {
        EncryptorBuilder::new(secret)
    }
}

impl<S: Serializer, R: RandomSource> MessageEncryptor<S, R> {
    /// The configured cipher.
    pub fn cipher(&self) -> CipherKind {
        self.cipher
    }

    /// The configured MAC digest.
    pub fn digest(&self) -> MacDigest {
        self.digest
    }

    /// Serialize and encrypt `value`.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::Serialization`] if the value cannot be
    /// serialized, or [`EncryptorError::RandomSource`] if no IV can be drawn.
    pub fn encrypt(&self, value: &Value) -> Result<String, EncryptorError> {
        let plaintext = self.serialize(value)?;
        self.encrypt_bytes(&plaintext)
    }

    /// Decrypt a message produced by [`MessageEncryptor::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidMessage`] on any failure.
    pub fn decrypt(&self, message: &str) -> Result<Value, EncryptorError> {
        let plaintext = self.decrypt_bytes(message)?;
        self.deserialize(&plaintext)
    }

    /// Serialize, encrypt and sign `value`.
    ///
    /// # Errors
    ///
    /// Same as [`MessageEncryptor::encrypt`].
    pub fn encrypt_and_sign(&self, value: &Value) -> Result<String, EncryptorError> {
        let plaintext = self.serialize(value)?;
        self.encrypt_and_sign_bytes(&plaintext)
    }

    /// Verify and decrypt a message produced by
    /// [`MessageEncryptor::encrypt_and_sign`].
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidMessage`] on any failure, including a
    /// MAC mismatch.
    pub fn decrypt_and_verify(&self, message: &str) -> Result<Value, EncryptorError> {
        let plaintext = self.decrypt_and_verify_bytes(message)?;
        self.deserialize(&plaintext)
    }

    /// Encrypt an opaque byte payload under a fresh random IV.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::RandomSource`] if no IV can be drawn, or
    /// [`EncryptorError::EncryptionFailure`] if the payload exceeds the cipher's
    /// limits.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String, EncryptorError> {
        let mut iv = vec![0u8; self.cipher.iv_len()];
        self.random.fill_bytes(&mut iv)?;

        let ciphertext = self
            .cipher
            .encrypt(self.key.expose(), &iv, plaintext)
            .map_err(|e| EncryptorError::EncryptionFailure(e.to_string()))?;

        Ok(EncryptedMessage { ciphertext, iv }.to_string_repr())
    }

    /// Decrypt a message produced by [`MessageEncryptor::encrypt_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidMessage`] on any failure.
    pub fn decrypt_bytes(&self, message: &str) -> Result<Vec<u8>, EncryptorError> {
        let parsed = EncryptedMessage::parse(message)?;
        if parsed.iv.len() != self.cipher.iv_len() {
            return Err(EncryptorError::InvalidMessage);
        }
        self.cipher
            .decrypt(self.key.expose(), &parsed.iv, &parsed.ciphertext)
            .map_err(|_| EncryptorError::InvalidMessage)
    }

    /// Encrypt an opaque byte payload and append an HMAC of the result.
    ///
    /// # Errors
    ///
    /// Same as [`MessageEncryptor::encrypt_bytes`].
    pub fn encrypt_and_sign_bytes(&self, plaintext: &[u8]) -> Result<String, EncryptorError> {
        let inner = self.encrypt_bytes(plaintext)?;
        let mac = self.digest.sign(self.sign_key.expose(), inner.as_bytes());
        Ok(SignedMessage::compose(&inner, &mac))
    }

    /// Verify the HMAC of a signed message, then decrypt it.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidMessage`] on any failure.
    pub fn decrypt_and_verify_bytes(&self, message: &str) -> Result<Vec<u8>, EncryptorError> {
        let signed = SignedMessage::parse(message)?;
        if !self
            .digest
            .verify(self.sign_key.expose(), signed.inner.as_bytes(), &signed.mac)
        {
            return Err(EncryptorError::InvalidMessage);
        }
        self.decrypt_bytes(signed.inner)
    }

    fn serialize(&self, value: &Value) -> Result<Vec<u8>, EncryptorError> {
        self.serializer
            .serialize(value)
            .map_err(|e| EncryptorError::Serialization(e.to_string()))
    }

    fn deserialize(&self, plaintext: &[u8]) -> Result<Value, EncryptorError> {
        self.serializer
            .deserialize(plaintext)
            .map_err(|_| EncryptorError::InvalidMessage)
    }
}

impl<S, R> std::fmt::Debug for MessageEncryptor<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageEncryptor")
            .field("cipher", &self.cipher)
            .field("digest", &self.digest)
            .field("key", &self.key)
            .field("sign_key", &self.sign_key)
            .finish_non_exhaustive()
    }
}
