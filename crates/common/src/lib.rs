//! Common types, wire format, and errors shared across the message encryptor crates.

pub mod error;
pub mod protocol;
pub mod value;

pub use error::EncryptorError;
pub use value::Value;
