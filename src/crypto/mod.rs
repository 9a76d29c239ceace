//! Cryptographic building blocks shared by every envelope format.
//!
//! Provides the secure random source and both key derivation schemes.

pub mod kdf;
pub mod random;

pub use kdf::{derive_key, derive_key_and_iv, derive_keys};
pub use random::{RandomSource, generate};

/// Length of the salt used by the modern formats (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the salt used by the legacy format (8 bytes).
pub const LEGACY_SALT_LEN: usize = 8;
/// Length of the AES-CBC initialization vector (16 bytes).
pub const IV_LEN: usize = 16;
/// Length of the AES-GCM nonce (12 bytes / 96 bits).
pub const NONCE_LEN: usize = 12;
/// Length of an AES-256 key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the HMAC-SHA256 key and tag (32 bytes).
pub const HMAC_LEN: usize = 32;
/// Length of the AES-GCM authentication tag (16 bytes).
pub const GCM_TAG_LEN: usize = 16;
/// PBKDF2-HMAC-SHA256 iteration count. Fixed for interoperability.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
