//! `msgcrypt`: command-line entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Build the [`MessageEncryptor`], read stdin, write the result to stdout.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encryptor::config::Config;
use encryptor::{telemetry, EncryptorError, MessageEncryptor, Value};
use tracing::{error, info, warn};

/// Reads a JSON document or a message on stdin and writes the result to stdout.
#[derive(Debug, Parser)]
#[command(name = "msgcrypt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Encrypt, sign, verify and decrypt structured messages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Encrypt the JSON document on stdin
    Encrypt,
    /// Decrypt the message on stdin into JSON
    Decrypt,
    /// Encrypt the JSON document on stdin and append an HMAC
    EncryptAndSign,
    /// Verify and decrypt the signed message on stdin into JSON
    DecryptAndVerify,
}

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Logging is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        cipher = %cfg.cipher,
        digest = %cfg.digest,
        key_policy = %cfg.key_policy,
        "msgcrypt starting"
    );

    // -----------------------------------------------------------------------
    // 4. Run
    // -----------------------------------------------------------------------
    let encryptor = cfg.build_encryptor().map_err(|e| {
        report(cli.command, &e);
        e
    })?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let output = run(&encryptor, cli.command, &input).map_err(|e| {
        report(cli.command, &e);
        e
    })?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write stdout")?;
    Ok(())
}

/// Log a failed command at a level matching who has to act on it.
fn report(command: Command, e: &anyhow::Error) {
    match classify(e) {
        Failure::Setup => error!(?command, error = %e, "encryptor setup rejected"),
        Failure::Rejected => warn!(?command, "message rejected"),
        Failure::Other => error!(?command, error = %e, "command failed"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// Secret, cipher, digest or key policy are unusable.
    Setup,
    /// The input message did not decrypt or verify.
    Rejected,
    Other,
}

fn classify(e: &anyhow::Error) -> Failure {
    match e.downcast_ref::<EncryptorError>() {
        Some(err) if err.is_construction_error() => Failure::Setup,
        Some(EncryptorError::InvalidMessage) => Failure::Rejected,
        _ => Failure::Other,
    }
}

fn run(encryptor: &MessageEncryptor, command: Command, input: &str) -> Result<String> {
    match command {
        Command::Encrypt | Command::EncryptAndSign => {
            let json: serde_json::Value =
                serde_json::from_str(input).context("input must be a JSON document")?;
            let value = Value::from_json(json);
            let message = if command == Command::Encrypt {
                encryptor.encrypt(&value)?
            } else {
                encryptor.encrypt_and_sign(&value)?
            };
            Ok(message)
        }
        Command::Decrypt | Command::DecryptAndVerify => {
            let message = input.trim();
            let value = if command == Command::Decrypt {
                encryptor.decrypt(message)?
            } else {
                encryptor.decrypt_and_verify(message)?
            };
            serde_json::to_string_pretty(&value.to_json()).context("failed to render JSON")
        }
    }
}
