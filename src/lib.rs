//! Interoperable AES envelopes.
//!
//! Three formats, byte-compatible with other implementations of the same
//! layouts:
//!
//! - [`Mode::Cbc`]: AES-256-CBC + HMAC-SHA256, keys from PBKDF2-SHA256
//! - [`Mode::Gcm`]: AES-256-GCM, key from PBKDF2-SHA256
//! - [`Mode::Legacy`]: OpenSSL `Salted__` AES-256-CBC, key and IV from MD5
//!
//! ```no_run
//! use aes_bridge::Mode;
//!
//! let envelope = Mode::Gcm.encrypt("My secret message", "MyStrongPass")?;
//! let plaintext = Mode::Gcm.decrypt(&envelope, "MyStrongPass")?;
//! assert_eq!(plaintext.as_slice(), b"My secret message");
//! # Ok::<(), aes_bridge::CipherError>(())
//! ```

pub mod crypto;
mod error;
pub mod format;

pub use crate::error::{CipherError, Result};
pub use crate::format::{cbc, gcm, legacy};
use std::{fmt, str::FromStr};
use zeroize::Zeroizing;

/// Envelope format, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Cbc,
    Gcm,
    Legacy,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Cbc, Mode::Gcm, Mode::Legacy];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Cbc => "cbc",
            Mode::Gcm => "gcm",
            Mode::Legacy => "legacy",
        }
    }

    /// Encrypts `plaintext` and returns the base64 envelope.
    pub fn encrypt(
        &self,
        plaintext: impl AsRef<[u8]>,
        password: impl AsRef<[u8]>,
    ) -> Result<String> {
        match self {
            Mode::Cbc => cbc::encrypt(plaintext, password),
            Mode::Gcm => gcm::encrypt(plaintext, password),
            Mode::Legacy => legacy::encrypt(plaintext, password),
        }
    }

    /// Decrypts a base64 envelope.
    pub fn decrypt(
        &self,
        data: impl AsRef<str>,
        password: impl AsRef<[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            Mode::Cbc => cbc::decrypt(data, password),
            Mode::Gcm => gcm::decrypt(data, password),
            Mode::Legacy => legacy::decrypt(data, password),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CipherError::UnknownMode(s.to_string()))
    }
}

/// Encrypts with the given mode. See [`Mode::encrypt`].
pub fn encrypt(
    mode: Mode,
    plaintext: impl AsRef<[u8]>,
    password: impl AsRef<[u8]>,
) -> Result<String> {
    mode.encrypt(plaintext, password)
}

/// Decrypts with the given mode. See [`Mode::decrypt`].
pub fn decrypt(
    mode: Mode,
    data: impl AsRef<str>,
    password: impl AsRef<[u8]>,
) -> Result<Zeroizing<Vec<u8>>> {
    mode.decrypt(data, password)
}
