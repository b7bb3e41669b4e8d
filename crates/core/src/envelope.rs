//! Domain-separated hashing and signed block envelopes
//!
//! ```text
//! envelope = 0x41 || (31 + recovery_id) || r || s || block
//!            ^^^^    ^^^^^^^^^^^^^^^^^^^    ^^^^^^    ^^^^^
//!            1B      1B                     64B       N bytes
//! ```
//!
//! The block is signed over `domain_hash(block)`; the envelope itself is
//! identified by `domain_hash(envelope)`.

use crate::block::read_nonce;
use crate::error::{GovmError, Result};
use crate::params::{
    COMPACT_SIGNATURE_SIZE, DOMAIN_TAG, ENVELOPE_OVERHEAD, RECOVERY_OFFSET, SIGNATURE_SIZE,
};
use crate::sponge::{Digest, Sha3_256};

/// Raw secp256k1 secret scalar
pub type SecretKey = [u8; 32];

/// A compact recoverable ECDSA signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactSignature {
    /// r || s, 32 bytes each, big-endian
    pub bytes: [u8; COMPACT_SIGNATURE_SIZE],
    /// Recovery id in 0..=3
    pub recovery_id: u8,
}

/// Signing capability injected into envelope construction
///
/// Implementations sign a 32-byte message digest with a secret key and
/// return the compact serialization. Deterministic and randomized signing
/// are both acceptable as long as `recovery_id` matches the signature.
pub trait RecoverableSigner {
    fn sign_recoverable(&self, digest: &Digest, secret_key: &SecretKey) -> Result<CompactSignature>;
}

impl<S: RecoverableSigner + ?Sized> RecoverableSigner for &S {
    fn sign_recoverable(&self, digest: &Digest, secret_key: &SecretKey) -> Result<CompactSignature> {
        (**self).sign_recoverable(digest, secret_key)
    }
}

/// A hasher with the domain tag already absorbed
#[inline]
pub fn domain_hasher() -> Sha3_256 {
    Sha3_256::new().chain(DOMAIN_TAG)
}

/// SHA3-256 of `"govm" || payload`
#[inline]
pub fn domain_hash(payload: &[u8]) -> Digest {
    domain_hasher().chain(payload).finalize()
}

/// A signed block: length prefix, recovery byte, compact signature, block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope(Vec<u8>);

impl Envelope {
    /// Wrap existing envelope bytes, checking the fixed prefix
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < ENVELOPE_OVERHEAD {
            return Err(GovmError::InvalidLength {
                expected: ENVELOPE_OVERHEAD,
                actual: bytes.len(),
            });
        }
        if bytes[0] as usize != SIGNATURE_SIZE {
            return Err(GovmError::InvalidLength {
                expected: SIGNATURE_SIZE,
                actual: bytes[0] as usize,
            });
        }
        Ok(Self(bytes))
    }

    /// Declared signature length, always 65
    pub fn signature_len(&self) -> u8 {
        self.0[0]
    }

    /// `27 + 4 + recovery_id`
    pub fn recovery_byte(&self) -> u8 {
        self.0[1]
    }

    pub fn recovery_id(&self) -> u8 {
        self.recovery_byte().wrapping_sub(RECOVERY_OFFSET)
    }

    /// Compact signature r || s
    pub fn signature(&self) -> &[u8] {
        &self.0[2..ENVELOPE_OVERHEAD]
    }

    /// The signed block bytes
    pub fn block(&self) -> &[u8] {
        &self.0[ENVELOPE_OVERHEAD..]
    }

    /// Nonce carried in the block's trailing 8 bytes
    pub fn nonce(&self) -> Result<u64> {
        read_nonce(self.block())
    }

    /// Outer digest identifying this envelope
    pub fn digest(&self) -> Digest {
        domain_hash(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Envelope {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Allocate an unsigned envelope buffer around `block`
pub(crate) fn envelope_buffer(block: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; ENVELOPE_OVERHEAD + block.len()];
    buf[0] = SIGNATURE_SIZE as u8;
    buf[ENVELOPE_OVERHEAD..].copy_from_slice(block);
    buf
}

/// Sign the block held in `buf[66..]` and fill in the signature prefix
///
/// Returns the outer digest of the whole buffer.
pub(crate) fn seal_in_place<S: RecoverableSigner + ?Sized>(
    buf: &mut [u8],
    secret_key: &SecretKey,
    signer: &S,
) -> Result<Digest> {
    let inner = domain_hash(&buf[ENVELOPE_OVERHEAD..]);
    let signature = signer.sign_recoverable(&inner, secret_key)?;
    debug_assert!(signature.recovery_id <= 3);

    buf[1] = RECOVERY_OFFSET + signature.recovery_id;
    buf[2..ENVELOPE_OVERHEAD].copy_from_slice(&signature.bytes);
    Ok(domain_hash(buf))
}

/// Sign a block and wrap it in an envelope
///
/// Returns the envelope and its outer digest. Signing errors are returned
/// as-is.
pub fn sign_block<S: RecoverableSigner + ?Sized>(
    block: &[u8],
    secret_key: &SecretKey,
    signer: &S,
) -> Result<(Envelope, Digest)> {
    let mut buf = envelope_buffer(block);
    let digest = seal_in_place(&mut buf, secret_key, signer)?;
    Ok((Envelope(buf), digest))
}
