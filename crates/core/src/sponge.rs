//! SHA3-256 sponge built on the Keccak-f[1600] permutation
//!
//! Input is absorbed in 136-byte rate blocks, XORed into the state as
//! little-endian lanes. Bytes that do not yet fill a block are buffered
//! across `update` calls.
//!
//! The hasher is single-use: `finalize` takes `self` by value, so absorbing
//! after finalization or finalizing twice does not compile.

use crate::keccak::keccak_f;
use crate::params::{DIGEST_SIZE, RATE, RATE_WORDS, STATE_WORDS};

/// A 32-byte digest
pub type Digest = [u8; DIGEST_SIZE];

/// SHA3 domain padding byte
const PAD_START: u8 = 0x06;

/// Final-bit marker of multi-rate padding
const PAD_END: u8 = 0x80;

/// Streaming SHA3-256 hasher
#[derive(Clone)]
pub struct Sha3_256 {
    state: [u64; STATE_WORDS],
    /// Bytes buffered in `buf`, always below `RATE` between calls
    partial: usize,
    buf: [u8; RATE],
}

impl Sha3_256 {
    /// Create a hasher with a zeroed state
    pub fn new() -> Self {
        Self {
            state: [0u64; STATE_WORDS],
            partial: 0,
            buf: [0u8; RATE],
        }
    }

    /// Absorb `data`
    ///
    /// May be called any number of times; the result only depends on the
    /// concatenation of all chunks.
    pub fn update(&mut self, mut data: &[u8]) {
        if self.partial > 0 {
            let take = (RATE - self.partial).min(data.len());
            self.buf[self.partial..self.partial + take].copy_from_slice(&data[..take]);
            self.partial += take;
            data = &data[take..];

            if self.partial < RATE {
                return;
            }
            absorb_block(&mut self.state, &self.buf);
            self.partial = 0;
        }

        let mut blocks = data.chunks_exact(RATE);
        for block in &mut blocks {
            absorb_block(&mut self.state, block);
        }

        let rest = blocks.remainder();
        self.buf[..rest.len()].copy_from_slice(rest);
        self.partial = rest.len();
    }

    /// Builder-style `update`
    pub fn chain(mut self, data: &[u8]) -> Self {
        self.update(data);
        self
    }

    /// Pad, permute once more and squeeze the digest
    pub fn finalize(mut self) -> Digest {
        let mut block = [0u8; RATE];
        block[..self.partial].copy_from_slice(&self.buf[..self.partial]);
        block[self.partial] = PAD_START;
        // Same byte as PAD_START when only one byte of the block is free
        block[RATE - 1] |= PAD_END;
        absorb_block(&mut self.state, &block);

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, lane) in out.chunks_exact_mut(8).zip(self.state.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }

        self.state = [0u64; STATE_WORDS];
        self.buf = [0u8; RATE];
        self.partial = 0;
        out
    }
}

impl Default for Sha3_256 {
    fn default() -> Self {
        Self::new()
    }
}

/// XOR one rate block into the state and permute
#[inline(always)]
fn absorb_block(state: &mut [u64; STATE_WORDS], block: &[u8]) {
    debug_assert_eq!(block.len(), RATE);
    for (lane, word) in state[..RATE_WORDS].iter_mut().zip(block.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(word);
        *lane ^= u64::from_le_bytes(bytes);
    }
    keccak_f(state);
}

/// Single-shot SHA3-256 of `data`
pub fn sha3_256(data: &[u8]) -> Digest {
    Sha3_256::new().chain(data).finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_fips202() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn one_free_byte_combines_padding() {
        // 135 bytes leave exactly one byte for 0x06 | 0x80
        let data = [0x61u8; RATE - 1];
        let expected = {
            use sha3::Digest as _;
            sha3::Sha3_256::digest(data)
        };
        assert_eq!(&sha3_256(&data)[..], expected.as_slice());
    }

    #[test]
    fn partial_buffer_never_holds_full_block() {
        let mut hasher = Sha3_256::new();
        hasher.update(&[1u8; 100]);
        hasher.update(&[2u8; 36]);
        assert_eq!(hasher.partial, 0);
        hasher.update(&[3u8; RATE * 2 + 5]);
        assert_eq!(hasher.partial, 5);
    }
}
