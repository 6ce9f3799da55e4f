//! Cryptographic primitives: AEAD ciphers, HMAC tags, and random bytes.
//!
//! This module knows nothing about the textual message format or about
//! serialization. It operates on raw byte slices only.

pub mod cipher;
pub mod mac;
pub mod random;

pub use cipher::{CipherKind, IV_LEN, KEY_LEN};
pub use mac::MacDigest;
pub use random::{OsRandom, RandomSource};
