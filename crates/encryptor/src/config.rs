//! Configuration loading and validation for the `msgcrypt` binary.
//!
//! All values are read from `MSGCRYPT_*` environment variables at startup. The
//! process exits with a clear error message if any required variable is
//! missing or invalid.

use anyhow::{Context, Result};
use base64::Engine as _;
use common::protocol::BASE64;
use serde::Deserialize;

use crate::crypto::{CipherKind, MacDigest};
use crate::encryptor::MessageEncryptor;
use crate::key::{KeyPolicy, Secret};

/// Prefix shared by every environment variable the binary reads.
pub const ENV_PREFIX: &str = "MSGCRYPT";

/// Validated `msgcrypt` configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Standard base64 encoding of the main secret. **Required.**
    pub secret: String,

    /// Standard base64 encoding of a separate HMAC secret.
    #[serde(default)]
    pub sign_secret: Option<String>,

    /// Cipher identifier.
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// HMAC digest identifier.
    #[serde(default = "default_digest")]
    pub digest: String,

    /// Handling of secrets longer than the key size.
    #[serde(default = "default_key_policy")]
    pub key_policy: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_cipher() -> String {
    CipherKind::default().as_str().into()
}
fn default_digest() -> String {
    MacDigest::default().as_str().into()
}
fn default_key_policy() -> String {
    KeyPolicy::Strict.as_str().into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Construct the encryptor this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error if a field fails to parse or the secret is rejected by
    /// the key policy.
    pub fn build_encryptor(&self) -> Result<MessageEncryptor> {
        let secret = decode_secret(&self.secret, "SECRET")?;
        let mut builder = MessageEncryptor::builder(secret.expose())
            .cipher(self.cipher.parse::<CipherKind>().context("invalid MSGCRYPT_CIPHER")?)
            .digest(self.digest.parse::<MacDigest>().context("invalid MSGCRYPT_DIGEST")?)
            .key_policy(
                self.key_policy
                    .parse::<KeyPolicy>()
                    .context("invalid MSGCRYPT_KEY_POLICY")?,
            );

        if let Some(sign_secret) = &self.sign_secret {
            let sign_secret = decode_secret(sign_secret, "SIGN_SECRET")?;
            builder = builder.sign_secret(sign_secret.expose());
        }

        builder
            .build()
            .context("secret rejected for the configured cipher and key policy")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        decode_secret(&self.secret, "SECRET")?;
        if let Some(sign_secret) = &self.sign_secret {
            decode_secret(sign_secret, "SIGN_SECRET")?;
        }
        self.cipher
            .parse::<CipherKind>()
            .context("invalid MSGCRYPT_CIPHER")?;
        self.digest
            .parse::<MacDigest>()
            .context("invalid MSGCRYPT_DIGEST")?;
        self.key_policy
            .parse::<KeyPolicy>()
            .context("invalid MSGCRYPT_KEY_POLICY")?;
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret", &"[REDACTED]")
            .field("sign_secret", &self.sign_secret.as_ref().map(|_| "[REDACTED]"))
            .field("cipher", &self.cipher)
            .field("digest", &self.digest)
            .field("key_policy", &self.key_policy)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn decode_secret(encoded: &str, name: &str) -> Result<Secret> {
    if encoded.trim().is_empty() {
        anyhow::bail!("{ENV_PREFIX}_{name} is required and must not be empty");
    }
    let bytes = BASE64
        .decode(encoded.trim())
        .with_context(|| format!("{ENV_PREFIX}_{name} must be standard base64"))?;
    Ok(Secret::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(secret: &str) -> Config {
        Config {
            secret: secret.into(),
            sign_secret: None,
            cipher: default_cipher(),
            digest: default_digest(),
            key_policy: default_key_policy(),
            log_level: default_log_level(),
        }
    }

    fn encoded(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_cipher(), "aes-256-gcm-siv");
        assert_eq!(default_digest(), "sha256");
        assert_eq!(default_key_policy(), "strict");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_secret() {
        assert!(cfg("  ").validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base64() {
        assert!(cfg("not base64!").validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_cipher() {
        let mut c = cfg(&encoded(&[0u8; 32]));
        c.cipher = "rot13".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_sign_secret() {
        let mut c = cfg(&encoded(&[0u8; 32]));
        c.sign_secret = Some("%%%".into());
        assert!(c.validate().is_err());
    }

    #[test]
    fn strict_default_rejects_oversized_secret() {
        let c = cfg(&encoded(&[0u8; 64]));
        assert!(c.validate().is_ok());
        assert!(c.build_encryptor().is_err());
    }

    #[test]
    fn builds_working_encryptor() {
        let mut c = cfg(&encoded(&[3u8; 32]));
        c.sign_secret = Some(encoded(b"separate mac key"));
        c.digest = "sha512".into();
        let enc = c.build_encryptor().unwrap();
        assert_eq!(enc.digest(), MacDigest::Sha512);
        let msg = enc.encrypt_and_sign(&common::Value::from("x")).unwrap();
        assert_eq!(
            enc.decrypt_and_verify(&msg).unwrap(),
            common::Value::from("x")
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = cfg(&encoded(b"super secret key material......."));
        assert!(!format!("{c:?}").contains(&c.secret));
    }
}
