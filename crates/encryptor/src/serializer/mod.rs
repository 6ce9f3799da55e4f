//! Pluggable conversion between [`Value`]s and plaintext bytes.
//!
//! The encryptor treats serialized bytes as opaque. A serializer only has to
//! guarantee that `deserialize(serialize(v)) == v` for every value it accepts,
//! and that it rejects unsupported shapes instead of coercing them.

pub mod json;

pub use json::JsonSerializer;

use common::Value;
use thiserror::Error;

/// Errors produced by a [`Serializer`].
#[derive(Debug, Error)]
pub enum SerializerError {
    /// The value contains a shape this serializer cannot represent.
    #[error("unsupported value: {0}")]
    Unsupported(String),

    /// Encoding failed.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The bytes are not a valid encoding.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Strategy for turning values into bytes and back.
pub trait Serializer: Send + Sync {
    /// Encode `value` to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SerializerError::Unsupported`] or [`SerializerError::Encode`] if
    /// the value cannot be represented.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, SerializerError>;

    /// Decode bytes produced by [`Serializer::serialize`].
    ///
    /// # Errors
    ///
    /// Returns [`SerializerError::Decode`] if `bytes` is not a valid encoding.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value, SerializerError>;
}
