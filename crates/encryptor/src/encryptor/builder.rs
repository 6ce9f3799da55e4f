//! [`EncryptorBuilder`]: construction-time choices for a [`MessageEncryptor`].

use common::EncryptorError;
use tracing::{debug, warn};

use super::MessageEncryptor;
use crate::crypto::{CipherKind, MacDigest, OsRandom, RandomSource};
use crate::key::{self, KeyPolicy, Secret};
use crate::serializer::{JsonSerializer, Serializer};

type DeprecationHook = Box<dyn Fn(&str) + Send + Sync>;

/// Builder for [`MessageEncryptor`].
///
/// Defaults: AES-256-GCM-SIV, HMAC-SHA256, [`KeyPolicy::Truncate`],
/// [`JsonSerializer`], [`OsRandom`], sign secret equal to the main secret.
pub struct EncryptorBuilder<S = JsonSerializer, R = OsRandom> {
    secret: Secret,
    sign_secret: Option<Secret>,
    cipher: CipherKind,
    digest: MacDigest,
    key_policy: KeyPolicy,
    on_deprecation: Option<DeprecationHook>,
    serializer: S,
    random: R,
}

impl EncryptorBuilder {
    /// Start a builder for `secret` with every other setting at its default.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Secret::new(secret),
            sign_secret: None,
            cipher: CipherKind::default(),
            digest: MacDigest::default(),
            key_policy: KeyPolicy::default(),
            on_deprecation: None,
            serializer: JsonSerializer,
            random: OsRandom,
        }
    }
}

impl<S, R> EncryptorBuilder<S, R> {
    /// Use a separate secret for the HMAC in signed messages.
    #[must_use]
    pub fn sign_secret(mut self, sign_secret: impl AsRef<[u8]>) -> Self {
        self.sign_secret = Some(Secret::new(sign_secret));
        self
    }

    /// Select the cipher.
    #[must_use]
    pub fn cipher(mut self, cipher: CipherKind) -> Self {
        self.cipher = cipher;
        self
    }

    /// Select the HMAC digest.
    #[must_use]
    pub fn digest(mut self, digest: MacDigest) -> Self {
        self.digest = digest;
        self
    }

    /// Select how a secret longer than the key size is handled.
    #[must_use]
    pub fn key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// Register a callback for deprecation notices raised by [`build`](Self::build).
    ///
    /// Notices are always logged as warnings as well.
    #[must_use]
    pub fn on_deprecation(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_deprecation = Some(Box::new(hook));
        self
    }

    /// Replace the serializer.
    pub fn serializer<S2: Serializer>(self, serializer: S2) -> EncryptorBuilder<S2, R> {
        EncryptorBuilder {
            secret: self.secret,
            sign_secret: self.sign_secret,
            cipher: self.cipher,
            digest: self.digest,
            key_policy: self.key_policy,
            on_deprecation: self.on_deprecation,
            serializer,
            random: self.random,
        }
    }

    /// Replace the random-byte source used for IVs.
    pub fn random_source<R2: RandomSource>(self, random: R2) -> EncryptorBuilder<S, R2> {
        EncryptorBuilder {
            secret: self.secret,
            sign_secret: self.sign_secret,
            cipher: self.cipher,
            digest: self.digest,
            key_policy: self.key_policy,
            on_deprecation: self.on_deprecation,
            serializer: self.serializer,
            random,
        }
    }
}

impl<S: Serializer, R: RandomSource> EncryptorBuilder<S, R> {
    /// Validate the secret and construct the encryptor.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InsufficientKeyLength`] if the secret is too
    /// short for the cipher, or [`EncryptorError::OversizedKey`] if it is too
    /// long under [`KeyPolicy::Strict`].
    pub fn build(self) -> Result<MessageEncryptor<S, R>, EncryptorError> {
        let prepared = key::prepare(self.secret.expose(), self.cipher, self.key_policy)?;

        if let Some(notice) = &prepared.notice {
            warn!(target: "encryptor::deprecation", cipher = %self.cipher, "{notice}");
            if let Some(hook) = &self.on_deprecation {
                hook(notice);
            }
        }

        let separate_sign_key = self.sign_secret.is_some();
        let sign_key = self.sign_secret.unwrap_or_else(|| self.secret.clone());

        debug!(
            cipher = %self.cipher,
            digest = %self.digest,
            key_policy = %self.key_policy,
            separate_sign_key,
            "message encryptor constructed"
        );

        Ok(MessageEncryptor {
            cipher: self.cipher,
            digest: self.digest,
            key: prepared.key,
            sign_key,
            serializer: self.serializer,
            random: self.random,
        })
    }
}

impl<S, R> std::fmt::Debug for EncryptorBuilder<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptorBuilder")
            .field("secret", &self.secret)
            .field("sign_secret", &self.sign_secret)
            .field("cipher", &self.cipher)
            .field("digest", &self.digest)
            .field("key_policy", &self.key_policy)
            .finish_non_exhaustive()
    }
}
