//! Block layout: opaque payload followed by a big-endian u64 nonce
//!
//! Search and signing only touch the trailing nonce field. `BlockHeader`
//! is the structured form of the standard 216-byte GOVM block, encoded
//! field by field in big-endian order.

use crate::error::{GovmError, Result};
use crate::params::{ADDRESS_SIZE, BLOCK_HEADER_SIZE, DIGEST_SIZE, NONCE_SIZE};

/// Read the trailing big-endian nonce of a block
pub fn read_nonce(block: &[u8]) -> Result<u64> {
    let start = nonce_offset(block.len())?;
    let mut bytes = [0u8; NONCE_SIZE];
    bytes.copy_from_slice(&block[start..]);
    Ok(u64::from_be_bytes(bytes))
}

/// Overwrite the trailing nonce of a block
pub fn write_nonce(block: &mut [u8], nonce: u64) -> Result<()> {
    let start = nonce_offset(block.len())?;
    block[start..].copy_from_slice(&nonce.to_be_bytes());
    Ok(())
}

#[inline]
fn nonce_offset(len: usize) -> Result<usize> {
    len.checked_sub(NONCE_SIZE).ok_or(GovmError::BufferTooShort {
        len,
        min: NONCE_SIZE,
    })
}

/// Producer address
pub type Address = [u8; ADDRESS_SIZE];

/// Link to another block or a transaction list
pub type Hash = [u8; DIGEST_SIZE];

/// Structured GOVM block header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub time: u64,
    pub previous: Hash,
    pub parent: Hash,
    pub left_child: Hash,
    pub right_child: Hash,
    pub trans_list_hash: Hash,
    pub producer: Address,
    pub chain: u64,
    pub index: u64,
    /// Must stay last: it is the block's nonce field
    pub nonce: u64,
}

impl BlockHeader {
    /// Encode as the packed big-endian wire layout
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_HEADER_SIZE);
        out.extend_from_slice(&self.time.to_be_bytes());
        out.extend_from_slice(&self.previous);
        out.extend_from_slice(&self.parent);
        out.extend_from_slice(&self.left_child);
        out.extend_from_slice(&self.right_child);
        out.extend_from_slice(&self.trans_list_hash);
        out.extend_from_slice(&self.producer);
        out.extend_from_slice(&self.chain.to_be_bytes());
        out.extend_from_slice(&self.index.to_be_bytes());
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out
    }

    /// Decode from exactly `BLOCK_HEADER_SIZE` bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != BLOCK_HEADER_SIZE {
            return Err(GovmError::InvalidLength {
                expected: BLOCK_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let mut reader = Reader { bytes, offset: 0 };
        Ok(Self {
            time: reader.u64(),
            previous: reader.array(),
            parent: reader.array(),
            left_child: reader.array(),
            right_child: reader.array(),
            trans_list_hash: reader.array(),
            producer: reader.array(),
            chain: reader.u64(),
            index: reader.u64(),
            nonce: reader.u64(),
        })
    }
}

/// Cursor over a buffer whose length was checked up front
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        out
    }

    fn u64(&mut self) -> u64 {
        u64::from_be_bytes(self.array())
    }
}
