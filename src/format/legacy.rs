//! OpenSSL `enc -aes-256-cbc -md md5` compatible format.
//!
//! Envelope (always base64 at the outer layer):
//! ```text
//! "Salted__" (8) | SALT (8) | CIPHERTEXT
//! ```
//!
//! There is no MAC: this format gives confidentiality only. It exists to
//! exchange data with older tooling and should not be used for new data.

use super::{b64_decode, b64_encode, cbc};
use crate::{
    crypto::{LEGACY_SALT_LEN, derive_key_and_iv, random},
    error::{CipherError, Result},
};
use zeroize::Zeroizing;

/// Marker that opens every legacy envelope.
pub const MAGIC: &[u8; MAGIC_LEN] = b"Salted__";
/// Length of the marker.
pub const MAGIC_LEN: usize = 8;

const HEADER_LEN: usize = MAGIC_LEN + LEGACY_SALT_LEN;

/// Encrypts `plaintext` and returns the base64 envelope.
pub fn encrypt(plaintext: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<String> {
    let plaintext = plaintext.as_ref();
    let salt = random::array::<LEGACY_SALT_LEN>()?;
    let (key, iv) = derive_key_and_iv(password.as_ref(), &salt);

    let ciphertext = cbc::aes_cbc_encrypt(&key, &iv, plaintext);

    let mut buf = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&salt);
    buf.extend_from_slice(&ciphertext);

    tracing::debug!(
        mode = "legacy",
        plaintext_len = plaintext.len(),
        envelope_len = buf.len(),
        "encrypted"
    );
    Ok(b64_encode(&buf))
}

/// Decrypts a base64 envelope produced by [`encrypt`] or by
/// `openssl enc -aes-256-cbc -md md5 -a`.
///
/// Data that decodes but does not start with `"Salted__"` yields an empty
/// plaintext rather than an error. Existing consumers of this format rely
/// on that.
///
/// # Errors
///
/// - [`CipherError::Decode`] if `data` is not valid base64
/// - [`CipherError::Malformed`] if the marker is present but the salt is truncated
/// - [`CipherError::Decrypt`] if the ciphertext does not decrypt and unpad
pub fn decrypt(data: impl AsRef<str>, password: impl AsRef<[u8]>) -> Result<Zeroizing<Vec<u8>>> {
    let data = b64_decode(data.as_ref())?;

    if !data.starts_with(MAGIC) {
        tracing::warn!(mode = "legacy", "missing Salted__ marker, returning empty plaintext");
        return Ok(Zeroizing::new(Vec::new()));
    }

    if data.len() < HEADER_LEN {
        return Err(CipherError::Malformed(format!(
            "legacy envelope must be at least {HEADER_LEN} bytes, got {}",
            data.len()
        )));
    }

    let salt = &data[MAGIC_LEN..HEADER_LEN];
    let (key, iv) = derive_key_and_iv(password.as_ref(), salt);

    let plaintext = cbc::aes_cbc_decrypt(&key, iv.as_slice(), &data[HEADER_LEN..])?;
    tracing::debug!(mode = "legacy", plaintext_len = plaintext.len(), "decrypted");
    Ok(plaintext)
}
