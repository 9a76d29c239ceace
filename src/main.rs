use aes_bridge::{Mode, format};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, builder::NonEmptyStringValueParser};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
mod auth;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Encrypt DATA and print a base64 envelope
    Encrypt,
    /// Decrypt a base64 envelope
    Decrypt,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// AES-256-CBC with HMAC-SHA256
    Cbc,
    /// AES-256-GCM
    Gcm,
    /// OpenSSL compatible "Salted__" AES-256-CBC (no integrity check)
    Legacy,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Cbc => Mode::Cbc,
            ModeArg::Gcm => Mode::Gcm,
            ModeArg::Legacy => Mode::Legacy,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "aes-bridge")]
#[command(
    version,
    about = "Encrypt and decrypt interoperable AES envelopes (cbc, gcm, legacy)."
)]
struct Cli {
    #[arg(value_enum)]
    action: Action,

    /// Envelope format
    #[arg(long, value_enum)]
    mode: ModeArg,

    /// Data to encrypt (UTF-8 text) or decrypt (base64 envelope)
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    data: String,

    /// Passphrase for key derivation
    #[arg(long, env = "AESBRIDGE_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Accept base64 input when encrypting, print base64 output when decrypting
    #[arg(long, default_value_t = false)]
    b64: bool,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("AESBRIDGE_LOG").unwrap_or_else(|_| EnvFilter::new("error"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn parse_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        // help and version go to stdout and succeed, usage errors exit 1
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    })
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging();

    let mode = Mode::from(args.mode);
    let passphrase = auth::read_passphrase(args.passphrase)?;

    let mut stdout = io::stdout().lock();
    match args.action {
        Action::Encrypt => {
            let plaintext = if args.b64 {
                format::b64_decode(&args.data).context("failed to base64 decode input data")?
            } else {
                args.data.into_bytes()
            };

            let envelope = mode
                .encrypt(&plaintext, passphrase.as_bytes())
                .with_context(|| format!("{mode} encryption failed"))?;
            writeln!(stdout, "{envelope}")?;
        }
        Action::Decrypt => {
            let plaintext = mode
                .decrypt(&args.data, passphrase.as_bytes())
                .with_context(|| format!("{mode} decryption failed"))?;

            if args.b64 {
                writeln!(stdout, "{}", format::b64_encode(&plaintext))?;
            } else {
                stdout.write_all(&plaintext)?;
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}
