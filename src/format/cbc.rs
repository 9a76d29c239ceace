//! AES-256-CBC with HMAC-SHA256 (encrypt-then-MAC).
//!
//! Envelope:
//! ```text
//! SALT (16) | IV (16) | CIPHERTEXT | HMAC-SHA256(IV || CIPHERTEXT) (32)
//! ```

use super::{Layout, b64_decode, b64_encode};
use crate::{
    crypto::{HMAC_LEN, IV_LEN, KEY_LEN, SALT_LEN, derive_keys, random},
    error::{CipherError, Result},
};
use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const LAYOUT: Layout = Layout::new("cbc", SALT_LEN, IV_LEN, HMAC_LEN);

/// Smallest well-formed envelope: salt, IV and tag around an empty body.
pub const MIN_LEN: usize = LAYOUT.min_len();

/// AES-256-CBC with PKCS#7 padding.
pub(crate) fn aes_cbc_encrypt(
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Vec<u8> {
    Aes256CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Inverse of [`aes_cbc_encrypt`]. Fails on bad padding or a partial block.
pub(crate) fn aes_cbc_decrypt(
    key: &[u8; KEY_LEN],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| CipherError::Malformed(format!("IV must be {IV_LEN} bytes")))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| CipherError::Decrypt)
}

fn compute_tag(hmac_key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<[u8; HMAC_LEN]> {
    let mut mac = HmacSha256::new_from_slice(hmac_key)
        .map_err(|_| CipherError::Malformed("invalid HMAC key length".into()))?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().into())
}

/// Encrypts `plaintext` into a raw binary envelope.
pub fn encrypt_bin(plaintext: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let plaintext = plaintext.as_ref();
    let salt = random::array::<SALT_LEN>()?;
    let iv = random::array::<IV_LEN>()?;

    let (aes_key, hmac_key) = derive_keys(password.as_ref(), &salt);

    let ciphertext = aes_cbc_encrypt(&aes_key, &iv, plaintext);
    let tag = compute_tag(hmac_key.as_slice(), &iv, &ciphertext)?;

    let envelope = LAYOUT.serialize(&salt, &iv, &ciphertext, &tag);
    tracing::debug!(
        mode = "cbc",
        plaintext_len = plaintext.len(),
        envelope_len = envelope.len(),
        "encrypted"
    );
    Ok(envelope)
}

/// Decrypts a raw binary envelope produced by [`encrypt_bin`].
///
/// The HMAC is checked in constant time before any decryption happens.
///
/// # Errors
///
/// - [`CipherError::Malformed`] if the envelope is shorter than [`MIN_LEN`]
/// - [`CipherError::Authentication`] on HMAC mismatch (wrong password or tampering)
/// - [`CipherError::Decrypt`] if an authenticated body does not unpad
pub fn decrypt_bin(
    data: impl AsRef<[u8]>,
    password: impl AsRef<[u8]>,
) -> Result<Zeroizing<Vec<u8>>> {
    let envelope = LAYOUT.parse(data.as_ref())?;

    let (aes_key, hmac_key) = derive_keys(password.as_ref(), envelope.salt());

    let expected = compute_tag(hmac_key.as_slice(), envelope.iv(), envelope.body())?;
    if !bool::from(expected.as_slice().ct_eq(envelope.tag())) {
        tracing::warn!(mode = "cbc", "HMAC verification failed");
        return Err(CipherError::Authentication);
    }

    let plaintext = aes_cbc_decrypt(&aes_key, envelope.iv(), envelope.body())?;
    tracing::debug!(mode = "cbc", plaintext_len = plaintext.len(), "decrypted");
    Ok(plaintext)
}

/// Encrypts `plaintext` and returns the envelope as base64.
pub fn encrypt(plaintext: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<String> {
    Ok(b64_encode(&encrypt_bin(plaintext, password)?))
}

/// Decrypts a base64 envelope produced by [`encrypt`].
pub fn decrypt(data: impl AsRef<str>, password: impl AsRef<[u8]>) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_bin(b64_decode(data.as_ref())?, password)
}
