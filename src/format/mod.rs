//! Envelope formats.
//!
//! Each submodule owns one byte layout and its failure rules. This module
//! holds the pieces they share: base64 wrapping and fixed-field splitting.

use crate::error::{CipherError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};

pub mod cbc;
pub mod gcm;
pub mod legacy;

/// Encodes an envelope as standard, padded base64.
pub fn b64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes standard, padded base64. Surrounding whitespace is ignored.
pub fn b64_decode(data: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(data.trim())?)
}

/// Fixed-size fields around a variable-length body:
/// `salt || iv || body || tag`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    name: &'static str,
    salt: usize,
    iv: usize,
    tag: usize,
}

/// Borrowed view of a parsed envelope.
#[derive(Debug)]
pub(crate) struct Envelope<'a> {
    salt: &'a [u8],
    iv: &'a [u8],
    body: &'a [u8],
    tag: &'a [u8],
}

impl<'a> Envelope<'a> {
    pub fn salt(&self) -> &'a [u8] {
        self.salt
    }

    /// IV or nonce, depending on the format.
    pub fn iv(&self) -> &'a [u8] {
        self.iv
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    pub fn tag(&self) -> &'a [u8] {
        self.tag
    }
}

impl Layout {
    pub const fn new(name: &'static str, salt: usize, iv: usize, tag: usize) -> Self {
        Self {
            name,
            salt,
            iv,
            tag,
        }
    }

    /// Smallest envelope holding every fixed field.
    pub const fn min_len(&self) -> usize {
        self.salt + self.iv + self.tag
    }

    /// Splits `data` into its fields.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Malformed`] if `data` is shorter than
    /// [`Layout::min_len`]. Nothing is sliced before this check.
    pub fn parse<'a>(&self, data: &'a [u8]) -> Result<Envelope<'a>> {
        if data.len() < self.min_len() {
            return Err(CipherError::Malformed(format!(
                "{} envelope must be at least {} bytes, got {}",
                self.name,
                self.min_len(),
                data.len()
            )));
        }

        let (salt, rest) = data.split_at(self.salt);
        let (iv, rest) = rest.split_at(self.iv);
        let (body, tag) = rest.split_at(rest.len() - self.tag);

        Ok(Envelope {
            salt,
            iv,
            body,
            tag,
        })
    }

    pub fn serialize(&self, salt: &[u8], iv: &[u8], body: &[u8], tag: &[u8]) -> Vec<u8> {
        debug_assert_eq!(salt.len(), self.salt);
        debug_assert_eq!(iv.len(), self.iv);
        debug_assert_eq!(tag.len(), self.tag);

        let mut buf = Vec::with_capacity(self.min_len() + body.len());
        buf.extend_from_slice(salt);
        buf.extend_from_slice(iv);
        buf.extend_from_slice(body);
        buf.extend_from_slice(tag);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: Layout = Layout::new("test", 4, 2, 3);

    #[test]
    fn parse_splits_fields() {
        let data = LAYOUT.serialize(b"salt", b"iv", b"body", b"tag");
        let envelope = LAYOUT.parse(&data).unwrap();

        assert_eq!(envelope.salt(), b"salt");
        assert_eq!(envelope.iv(), b"iv");
        assert_eq!(envelope.body(), b"body");
        assert_eq!(envelope.tag(), b"tag");
    }

    #[test]
    fn parse_accepts_empty_body() {
        let data = LAYOUT.serialize(b"salt", b"iv", b"", b"tag");
        let envelope = LAYOUT.parse(&data).unwrap();

        assert!(envelope.body().is_empty());
        assert_eq!(envelope.tag(), b"tag");
    }

    #[test]
    fn parse_too_short_fails() {
        let data = vec![0u8; LAYOUT.min_len() - 1];
        let err = LAYOUT.parse(&data).unwrap_err();
        assert!(matches!(err, CipherError::Malformed(_)));
    }

    #[test]
    fn b64_decode_ignores_surrounding_whitespace() {
        assert_eq!(b64_decode("  aGVsbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn b64_decode_rejects_garbage() {
        let err = b64_decode("not base64!").unwrap_err();
        assert!(matches!(err, CipherError::Decode(_)));
    }
}
