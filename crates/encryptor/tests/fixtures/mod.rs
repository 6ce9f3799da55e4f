#![allow(dead_code)]

use chrono::Utc;
use encryptor::protocol::{decode_segment, encode_segment};
use encryptor::{OsRandom, RandomSource, Value};

/// `len` bytes from the OS CSPRNG.
pub fn random_secret(len: usize) -> Vec<u8> {
    let mut secret = vec![0u8; len];
    OsRandom.fill_bytes(&mut secret).unwrap();
    secret
}

/// `{"some": "data", "now": <current time>}`
pub fn sample_data() -> Value {
    Value::record([("some", Value::from("data")), ("now", Value::from(Utc::now()))])
}

/// Decode a base64 segment, reverse its bytes, and re-encode it.
pub fn munge(segment: &str) -> String {
    let mut bytes = decode_segment(segment).unwrap();
    bytes.reverse();
    encode_segment(&bytes)
}
