//! Secure random bytes for salts, IVs and nonces.

use crate::error::{CipherError, Result};
use getrandom::fill;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bytes of fresh OS randomness hashed on each side of the counter.
const MIX_LEN: usize = 13;

static DEFAULT: RandomSource = RandomSource::new();

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|e| CipherError::Entropy(e.to_string()))
}

/// Random byte generator backed by the OS CSPRNG.
///
/// Every output byte is drawn from the OS generator, then masked with
/// SHA-256 blocks over fresh randomness and a per-call counter. The mask
/// can only add entropy; it never replaces the OS output.
#[derive(Debug, Default)]
pub struct RandomSource {
    counter: AtomicU64,
}

impl RandomSource {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Returns exactly `size` random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Entropy`] if the OS generator is unavailable.
    /// There is no fallback generator.
    pub fn generate(&self, size: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; size];
        secure_random(&mut out)?;

        let mut seed = [0u8; MIX_LEN * 2];
        secure_random(&mut seed)?;
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);

        for (index, chunk) in out.chunks_mut(32).enumerate() {
            let mask = Sha256::new()
                .chain_update(&seed[..MIX_LEN])
                .chain_update(counter.to_be_bytes())
                .chain_update(&seed[MIX_LEN..])
                .chain_update((index as u64).to_be_bytes())
                .finalize();
            chunk.iter_mut().zip(mask).for_each(|(b, m)| *b ^= m);
        }

        Ok(out)
    }

    /// Same as [`RandomSource::generate`] but into a fixed-size array.
    pub fn array<const N: usize>(&self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.generate(N)?);
        Ok(buf)
    }

    /// Number of calls served so far.
    pub fn calls(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Generates `size` random bytes from the process-wide source.
pub fn generate(size: usize) -> Result<Vec<u8>> {
    DEFAULT.generate(size)
}

pub(crate) fn array<const N: usize>() -> Result<[u8; N]> {
    DEFAULT.array()
}
