//! Base-10^9 chunk combination into a binary magnitude.
//!
//! Wide packed decimals are read as 9-digit chunks. Each chunk fits a
//! `u32`, and the chunks are folded into little-endian 32-bit words with a
//! single multiply-accumulate routine, whatever the chunk count.

use num_bigint::BigUint;

/// `10^9`, the radix of one chunk.
pub const CHUNK_RADIX: u32 = 1_000_000_000;

/// Unsigned integer as little-endian 32-bit words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Magnitude {
    words: Vec<u32>,
}

impl Magnitude {
    /// Zero with room for `words` words.
    pub fn with_capacity(words: usize) -> Self {
        Self {
            words: Vec::with_capacity(words),
        }
    }

    /// `self = self * multiplier + addend`, growing by a word on carry out.
    pub fn mul_add(&mut self, multiplier: u32, addend: u32) {
        let mut carry = u64::from(addend);
        for word in self.words.iter_mut() {
            let product = u64::from(*word) * u64::from(multiplier) + carry;
            *word = product as u32;
            carry = product >> 32;
        }
        if carry != 0 {
            self.words.push(carry as u32);
        }
    }

    /// Combine chunks given least significant first: `Σ chunk_i · (10^9)^i`.
    pub fn from_chunks(chunks: &[u32]) -> Self {
        // 31 digits need at most four words.
        let mut magnitude = Self::with_capacity(chunks.len());
        for &chunk in chunks.iter().rev() {
            magnitude.mul_add(CHUNK_RADIX, chunk);
        }
        magnitude
    }

    /// Words, least significant first. Zero has no words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Convert to a `BigUint` without copying the words.
    pub fn into_biguint(self) -> BigUint {
        BigUint::new(self.words)
    }
}
