//! AES-256-GCM.
//!
//! Envelope:
//! ```text
//! SALT (16) | NONCE (12) | CIPHERTEXT | TAG (16)
//! ```
//!
//! No associated data. Tag verification is done by the AEAD itself.

use super::{Layout, b64_decode, b64_encode};
use crate::{
    crypto::{GCM_TAG_LEN, NONCE_LEN, SALT_LEN, derive_key, random},
    error::{CipherError, Result},
};
use aes_gcm::{
    Aes256Gcm, Nonce, Tag,
    aead::{AeadInPlace, KeyInit},
};
use zeroize::Zeroizing;

const LAYOUT: Layout = Layout::new("gcm", SALT_LEN, NONCE_LEN, GCM_TAG_LEN);

/// Smallest well-formed envelope: salt, nonce and tag around an empty body.
pub const MIN_LEN: usize = LAYOUT.min_len();

/// Encrypts `plaintext` into a raw binary envelope.
pub fn encrypt_bin(plaintext: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let salt = random::array::<SALT_LEN>()?;
    let nonce = random::array::<NONCE_LEN>()?;

    let key = derive_key(password.as_ref(), &salt);
    let cipher = Aes256Gcm::new((&*key).into());

    let mut buffer = plaintext.as_ref().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| CipherError::Malformed("plaintext too large for AES-GCM".into()))?;

    let envelope = LAYOUT.serialize(&salt, &nonce, &buffer, &tag);
    tracing::debug!(
        mode = "gcm",
        plaintext_len = buffer.len(),
        envelope_len = envelope.len(),
        "encrypted"
    );
    Ok(envelope)
}

/// Decrypts a raw binary envelope produced by [`encrypt_bin`].
///
/// # Errors
///
/// - [`CipherError::Malformed`] if the envelope is shorter than [`MIN_LEN`]
/// - [`CipherError::Authentication`] if the tag does not verify
pub fn decrypt_bin(
    data: impl AsRef<[u8]>,
    password: impl AsRef<[u8]>,
) -> Result<Zeroizing<Vec<u8>>> {
    let envelope = LAYOUT.parse(data.as_ref())?;

    let key = derive_key(password.as_ref(), envelope.salt());
    let cipher = Aes256Gcm::new((&*key).into());

    let mut buffer = Zeroizing::new(envelope.body().to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(envelope.iv()),
            b"",
            buffer.as_mut_slice(),
            Tag::from_slice(envelope.tag()),
        )
        .map_err(|_| {
            tracing::warn!(mode = "gcm", "tag verification failed");
            CipherError::Authentication
        })?;

    tracing::debug!(mode = "gcm", plaintext_len = buffer.len(), "decrypted");
    Ok(buffer)
}

/// Encrypts `plaintext` and returns the envelope as base64.
pub fn encrypt(plaintext: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<String> {
    Ok(b64_encode(&encrypt_bin(plaintext, password)?))
}

/// Decrypts a base64 envelope produced by [`encrypt`].
pub fn decrypt(data: impl AsRef<str>, password: impl AsRef<[u8]>) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_bin(b64_decode(data.as_ref())?, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_text() {
        let envelope = encrypt("Hello, World!", "pw").unwrap();
        let plaintext = decrypt(&envelope, "pw").unwrap();
        assert_eq!(plaintext.as_slice(), b"Hello, World!");
    }

    #[test]
    fn roundtrip_empty_plaintext() {
        let envelope = encrypt_bin(b"", b"pw").unwrap();
        assert_eq!(envelope.len(), MIN_LEN);
        assert!(decrypt_bin(&envelope, b"pw").unwrap().is_empty());
    }

    #[test]
    fn roundtrip_large_binary_plaintext() {
        let plaintext: Vec<u8> = (0..10_000).map(|i| (i % 256) as u8).collect();
        let envelope = encrypt_bin(&plaintext, [0xffu8, 0x00]).unwrap();

        assert_eq!(envelope.len(), MIN_LEN + plaintext.len());
        assert_eq!(*decrypt_bin(&envelope, [0xffu8, 0x00]).unwrap(), plaintext);
    }

    #[test]
    fn same_input_gives_different_envelopes() {
        let a = encrypt_bin(b"same", b"pw").unwrap();
        let b = encrypt_bin(b"same", b"pw").unwrap();

        assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
        assert_ne!(a[SALT_LEN..SALT_LEN + NONCE_LEN], b[SALT_LEN..SALT_LEN + NONCE_LEN]);
        assert_eq!(*decrypt_bin(&a, b"pw").unwrap(), *decrypt_bin(&b, b"pw").unwrap());
    }

    #[test]
    fn wrong_password_fails_authentication() {
        let envelope = encrypt_bin(b"secret", b"correct").unwrap();
        let err = decrypt_bin(&envelope, b"wrong").unwrap_err();
        assert!(matches!(err, CipherError::Authentication));
    }

    #[test]
    fn tampering_is_detected() {
        let envelope = encrypt_bin(b"attack at dawn", b"pw").unwrap();
        let last = envelope.len() - 1;
        let tag_start = envelope.len() - GCM_TAG_LEN;

        for index in [0, SALT_LEN, SALT_LEN + NONCE_LEN, tag_start - 1, tag_start, last] {
            let mut tampered = envelope.clone();
            tampered[index] ^= 0x80;
            let err = decrypt_bin(&tampered, b"pw").unwrap_err();
            assert!(
                matches!(err, CipherError::Authentication),
                "byte {index} not authenticated: {err}"
            );
        }
    }

    #[test]
    fn short_envelope_is_malformed() {
        for len in [0, SALT_LEN + NONCE_LEN - 1, MIN_LEN - 1] {
            let err = decrypt_bin(vec![0u8; len], b"pw").unwrap_err();
            assert!(matches!(err, CipherError::Malformed(_)), "len {len}: {err}");
        }
    }

    #[test]
    fn cbc_envelope_is_rejected() {
        let envelope = crate::format::cbc::encrypt_bin(b"cross format", b"pw").unwrap();
        let err = decrypt_bin(&envelope, b"pw").unwrap_err();
        assert!(matches!(err, CipherError::Authentication));
    }
}
