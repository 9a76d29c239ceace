use thiserror::Error;

/// Errors produced while building or opening an envelope.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Input too short for the fixed fields of its format, or otherwise structurally broken.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// HMAC (CBC) or AEAD tag (GCM) verification failed.
    #[error("authentication failed: invalid password or corrupted data")]
    Authentication,

    #[error("invalid base64 input: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Block decryption failed after the envelope was accepted (bad padding or alignment).
    #[error("decryption failed: invalid password or corrupted data")]
    Decrypt,

    #[error("OS random generator unavailable: {0}")]
    Entropy(String),

    #[error("unknown mode '{0}', expected one of: cbc, gcm, legacy")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, CipherError>;
