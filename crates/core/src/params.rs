//! GOVM hashing and envelope parameters
//!
//! Sizes are fixed by the block wire format; the sponge parameters are
//! those of SHA3-256.

/// Digest size in bytes
pub const DIGEST_SIZE: usize = 32;

/// Keccak state width in bytes (1600 bits)
pub const STATE_SIZE: usize = 200;

/// Number of 64-bit lanes in the Keccak state
pub const STATE_WORDS: usize = STATE_SIZE / 8;

/// Sponge rate in bytes (200 - 2 * 32 = 136)
pub const RATE: usize = STATE_SIZE - 2 * DIGEST_SIZE;

/// Sponge rate in 64-bit words
pub const RATE_WORDS: usize = RATE / 8;

/// Keccak-f[1600] round count
pub const KECCAK_ROUNDS: usize = 24;

/// Tag absorbed before every payload hashed by `domain_hash`
pub const DOMAIN_TAG: &[u8; 4] = b"govm";

/// Compact ECDSA signature size (r || s)
pub const COMPACT_SIGNATURE_SIZE: usize = 64;

/// Signature size as recorded in the envelope prefix (recovery byte + r || s)
pub const SIGNATURE_SIZE: usize = COMPACT_SIGNATURE_SIZE + 1;

/// Offset added to the recovery id: 27 (Ethereum style) + 4 (compressed key)
pub const RECOVERY_OFFSET: u8 = 27 + 4;

/// Bytes preceding the block inside an envelope
pub const ENVELOPE_OVERHEAD: usize = 1 + SIGNATURE_SIZE;

/// Size of the trailing big-endian nonce field of a block
pub const NONCE_SIZE: usize = 8;

/// Producer address size inside a block header
pub const ADDRESS_SIZE: usize = 24;

/// Encoded block header size
pub const BLOCK_HEADER_SIZE: usize = 8 + 5 * DIGEST_SIZE + ADDRESS_SIZE + 3 * 8;
