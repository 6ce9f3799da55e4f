//! Structured logging for the `msgcrypt` binary.
//!
//! # Telemetry invariants
//!
//! - **No key material, plaintext or ciphertext** may appear in any log field.
//! - Decryption failures are never logged with the stage that failed.
//! - Log level is configurable via `MSGCRYPT_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` takes precedence when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Writes JSON lines to stderr so that stdout carries only command output.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
