//! Entropy sources for key generation.
//!
//! Key generation consumes randomness through [`EntropySource`], which can
//! fail instead of truncating. [`Entropy`] is the deterministic default: a
//! seed of at least [`SEED_BYTES`] expanded with SHA-512 in counter mode,
//!
//! ```text
//! block_i = SHA-512(seed || i as u64 little-endian),  i = 0, 1, 2, ...
//! ```
//!
//! consumed byte by byte. The same seed always yields the same stream, which
//! is what makes golden key vectors reproducible.
//!
//! [`RngEntropy`] adapts any `rand_core` generator, e.g. `OsRng` for fresh
//! keys or `ChaCha20Rng` in tests.

use crate::{
    error::{BlissError, Result},
    params::SEED_BYTES,
};
use rand_core::RngCore;
use sha2::{digest::generic_array::GenericArray, Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

const BLOCK_BYTES: usize = 64;

/// A source of randomness that reports exhaustion instead of truncating.
pub trait EntropySource {
    /// Fill `dest` entirely, or fail without consuming anything.
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()>;

    /// Draw a little-endian `u16`.
    fn next_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.try_fill(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).try_fill(dest)
    }
}

/// Deterministic SHA-512 counter-mode entropy expanded from a seed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Entropy {
    seed: Vec<u8>,
    counter: u64,
    block: [u8; BLOCK_BYTES],
    position: usize,
    /// Bytes this source may still hand out, if bounded.
    remaining: Option<u64>,
}

impl Entropy {
    /// Create an unbounded entropy stream from `seed`.
    ///
    /// Fails if the seed is shorter than [`SEED_BYTES`].
    pub fn new(seed: &[u8]) -> Result<Self> {
        if seed.len() < SEED_BYTES {
            return Err(BlissError::Entropy("seed shorter than SHA-512 digest"));
        }
        Ok(Self {
            seed: seed.to_vec(),
            counter: 0,
            block: [0u8; BLOCK_BYTES],
            position: BLOCK_BYTES,
            remaining: None,
        })
    }

    /// Bound the total number of bytes this source will produce.
    pub fn with_limit(mut self, max_bytes: u64) -> Self {
        self.remaining = Some(max_bytes);
        self
    }

    /// Bytes left before the source is exhausted, if bounded.
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    fn refill(&mut self) -> Result<()> {
        let mut hasher = Sha512::new();
        hasher.update(&self.seed);
        hasher.update(self.counter.to_le_bytes());
        hasher.finalize_into(GenericArray::from_mut_slice(&mut self.block));
        self.counter = self
            .counter
            .checked_add(1)
            .ok_or(BlissError::Entropy("counter space exhausted"))?;
        self.position = 0;
        Ok(())
    }
}

impl EntropySource for Entropy {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()> {
        if let Some(remaining) = self.remaining {
            if (dest.len() as u64) > remaining {
                return Err(BlissError::Entropy("entropy budget exhausted"));
            }
        }

        let mut written = 0;
        while written < dest.len() {
            if self.position == BLOCK_BYTES {
                self.refill()?;
            }
            let take = (BLOCK_BYTES - self.position).min(dest.len() - written);
            dest[written..written + take]
                .copy_from_slice(&self.block[self.position..self.position + take]);
            self.position += take;
            written += take;
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dest.len() as u64;
        }
        Ok(())
    }
}

/// Adapter exposing a `rand_core` generator as an [`EntropySource`].
pub struct RngEntropy<R: RngCore>(pub R);

impl<R: RngCore> EntropySource for RngEntropy<R> {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()> {
        self.0
            .try_fill_bytes(dest)
            .map_err(|_| BlissError::Entropy("random number generator failed"))
    }
}
