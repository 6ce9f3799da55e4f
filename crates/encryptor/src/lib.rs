//! Authenticated encryption of structured messages.
//!
//! A [`MessageEncryptor`] serializes a [`Value`], encrypts it under a random IV,
//! and encodes the result as `B64(ciphertext)--B64(iv)`. The signed form appends
//! `--B64(hmac)` computed over that text. Decryption of either form fails with a
//! single opaque [`EncryptorError::InvalidMessage`].
//!
//! ```no_run
//! use encryptor::{MessageEncryptor, Value};
//!
//! # fn main() -> Result<(), encryptor::EncryptorError> {
//! let encryptor = MessageEncryptor::new([7u8; 32])?;
//! let value = Value::record([("some", "data")]);
//! let message = encryptor.encrypt_and_sign(&value)?;
//! assert_eq!(encryptor.decrypt_and_verify(&message)?, value);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod encryptor;
pub mod key;
pub mod serializer;
pub mod telemetry;

pub use common::protocol;
pub use common::value::MAX_DEPTH;
pub use common::{EncryptorError, Value};
pub use crypto::{CipherKind, MacDigest, OsRandom, RandomSource};
pub use encryptor::{EncryptorBuilder, MessageEncryptor};
pub use key::{KeyPolicy, Secret};
pub use serializer::{JsonSerializer, Serializer, SerializerError};
