//! secp256k1 recoverable signing provider
//!
//! RFC 6979 deterministic ECDSA over the 32-byte message digest, low-S
//! normalized, serialized as `r || s` plus a recovery id.

use std::fmt;

use bip32::secp256k1::ecdsa::SigningKey;
use govm_core::{CompactSignature, Digest, GovmError, RecoverableSigner, Result, SecretKey};

/// Signs envelope digests with secp256k1
///
/// Parsing a secret key derives its public key, which costs about as much
/// as a signature. `with_key` keeps one parsed key around for the mining
/// loop; other keys are parsed per call.
#[derive(Clone, Default)]
pub struct Secp256k1Signer {
    cached: Option<(SecretKey, SigningKey)>,
}

impl Secp256k1Signer {
    /// A signer that parses the key on every call
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// A signer with `secret_key` parsed up front
    pub fn with_key(secret_key: &SecretKey) -> Result<Self> {
        Ok(Self {
            cached: Some((*secret_key, parse_key(secret_key)?)),
        })
    }

    fn sign_with(key: &SigningKey, digest: &Digest) -> Result<CompactSignature> {
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(digest)
            .map_err(|e| GovmError::InvalidKey(e.to_string()))?;

        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&signature.to_bytes());
        Ok(CompactSignature {
            bytes,
            recovery_id: recovery_id.to_byte(),
        })
    }
}

impl RecoverableSigner for Secp256k1Signer {
    fn sign_recoverable(&self, digest: &Digest, secret_key: &SecretKey) -> Result<CompactSignature> {
        match &self.cached {
            Some((cached, key)) if cached == secret_key => Self::sign_with(key, digest),
            _ => Self::sign_with(&parse_key(secret_key)?, digest),
        }
    }
}

impl fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Signer")
            .field("cached", &self.cached.is_some())
            .finish()
    }
}

/// Parse a raw scalar, rejecting zero and values above the curve order
pub fn parse_key(secret_key: &SecretKey) -> Result<SigningKey> {
    SigningKey::from_slice(secret_key).map_err(|e| GovmError::InvalidKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_key_rejected() {
        let err = Secp256k1Signer::new()
            .sign_recoverable(&[1u8; 32], &[0u8; 32])
            .unwrap_err();
        assert!(matches!(err, GovmError::InvalidKey(_)));
        assert!(Secp256k1Signer::with_key(&[0xFFu8; 32]).is_err());
    }

    #[test]
    fn test_cached_key_matches_fresh_parse() {
        let key = [0x42u8; 32];
        let digest = [9u8; 32];
        let cached = Secp256k1Signer::with_key(&key).unwrap();
        let fresh = Secp256k1Signer::new();

        assert_eq!(
            cached.sign_recoverable(&digest, &key).unwrap(),
            fresh.sign_recoverable(&digest, &key).unwrap()
        );

        // A different key bypasses the cache
        let other = [0x43u8; 32];
        assert_eq!(
            cached.sign_recoverable(&digest, &other).unwrap(),
            fresh.sign_recoverable(&digest, &other).unwrap()
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = Secp256k1Signer::with_key(&[0x42u8; 32]).unwrap();
        let shown = format!("{:?}", signer);
        assert_eq!(shown, "Secp256k1Signer { cached: true }");
    }
}
