use super::{HMAC_LEN, IV_LEN, KEY_LEN, PBKDF2_ITERATIONS};
use md5::{Digest, Md5};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

/// PBKDF2-HMAC-SHA256 with the fixed iteration count, `N` bytes of output.
fn pbkdf2_sha256<const N: usize>(password: &[u8], salt: &[u8]) -> Zeroizing<[u8; N]> {
    let mut out = Zeroizing::new([0u8; N]);
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, out.as_mut_slice());
    out
}

/// Derive the AES key and HMAC key for the CBC format.
///
/// 64 bytes of PBKDF2 output, split into `(aes_key, hmac_key)` in that order.
pub fn derive_keys(
    password: &[u8],
    salt: &[u8],
) -> (Zeroizing<[u8; KEY_LEN]>, Zeroizing<[u8; HMAC_LEN]>) {
    let material = pbkdf2_sha256::<{ KEY_LEN + HMAC_LEN }>(password, salt);

    let mut aes_key = Zeroizing::new([0u8; KEY_LEN]);
    let mut hmac_key = Zeroizing::new([0u8; HMAC_LEN]);
    aes_key.copy_from_slice(&material[..KEY_LEN]);
    hmac_key.copy_from_slice(&material[KEY_LEN..]);

    (aes_key, hmac_key)
}

/// Derive the single AES key for the GCM format.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    pbkdf2_sha256::<KEY_LEN>(password, salt)
}

/// OpenSSL-compatible key and IV derivation (`EVP_BytesToKey`, MD5, one round).
///
/// Chains `D_i = MD5(D_{i-1} || password || salt)` until 48 bytes exist.
/// Weak by modern standards; only used to read and write the legacy format.
pub fn derive_key_and_iv(
    password: &[u8],
    salt: &[u8],
) -> (Zeroizing<[u8; KEY_LEN]>, Zeroizing<[u8; IV_LEN]>) {
    let mut material = Zeroizing::new(Vec::<u8>::with_capacity(KEY_LEN + IV_LEN + 16));
    let mut block = Zeroizing::new(Vec::<u8>::new());

    while material.len() < KEY_LEN + IV_LEN {
        let digest = Md5::new()
            .chain_update(block.as_slice())
            .chain_update(password)
            .chain_update(salt)
            .finalize();
        block.clear();
        block.extend_from_slice(&digest);
        material.extend_from_slice(&digest);
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    let mut iv = Zeroizing::new([0u8; IV_LEN]);
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);

    (key, iv)
}
