//! C FFI bindings for block signing and nonce search
//!
//! Status codes: 0 success, -1 null pointer, -2 invalid key,
//! -3 block shorter than its nonce field.

use std::slice;

use govm_core::{find_best, sign_block, GovmError, SecretKey, DIGEST_SIZE, ENVELOPE_OVERHEAD};

use crate::signer::Secp256k1Signer;

pub const GOVM_OK: i32 = 0;
pub const GOVM_ERR_NULL: i32 = -1;
pub const GOVM_ERR_INVALID_KEY: i32 = -2;
pub const GOVM_ERR_BLOCK_TOO_SHORT: i32 = -3;

fn status(err: &GovmError) -> i32 {
    match err {
        GovmError::InvalidKey(_) => GOVM_ERR_INVALID_KEY,
        GovmError::BufferTooShort { .. } | GovmError::InvalidLength { .. } => {
            GOVM_ERR_BLOCK_TOO_SHORT
        }
    }
}

/// Sign a block into an envelope
/// - block, block_length: block bytes
/// - seckey: pointer to a 32-byte secret key
/// - result: buffer of `66 + block_length` bytes for the envelope
/// - hash: 32-byte buffer for the envelope digest
#[no_mangle]
pub extern "C" fn govm_block_sign(
    block: *const u8,
    block_length: usize,
    seckey: *const u8,
    result: *mut u8,
    hash: *mut u8,
) -> i32 {
    if block.is_null() || seckey.is_null() || result.is_null() || hash.is_null() {
        return GOVM_ERR_NULL;
    }

    unsafe {
        let block = slice::from_raw_parts(block, block_length);
        let key = read_key(seckey);
        match sign_block(block, &key, &Secp256k1Signer::new()) {
            Ok((envelope, digest)) => {
                slice::from_raw_parts_mut(result, ENVELOPE_OVERHEAD + block_length)
                    .copy_from_slice(envelope.as_bytes());
                slice::from_raw_parts_mut(hash, DIGEST_SIZE).copy_from_slice(&digest);
                GOVM_OK
            }
            Err(e) => status(&e),
        }
    }
}

/// Search `test_count` nonces from the block's own nonce
///
/// Writes the winning envelope to `result` (`66 + block_length` bytes), its
/// digest to `hash` and the winning nonce to `nonce`.
#[no_mangle]
pub extern "C" fn govm_block_best(
    test_count: u64,
    block: *const u8,
    block_length: usize,
    seckey: *const u8,
    result: *mut u8,
    hash: *mut u8,
    nonce: *mut u64,
) -> i32 {
    if block.is_null() || seckey.is_null() || result.is_null() || hash.is_null() || nonce.is_null()
    {
        return GOVM_ERR_NULL;
    }

    unsafe {
        let block = slice::from_raw_parts(block, block_length);
        let key = read_key(seckey);
        let signer = match Secp256k1Signer::with_key(&key) {
            Ok(signer) => signer,
            Err(e) => return status(&e),
        };

        match find_best(block, &key, &signer, test_count) {
            Ok(solution) => {
                slice::from_raw_parts_mut(result, ENVELOPE_OVERHEAD + block_length)
                    .copy_from_slice(solution.envelope.as_bytes());
                slice::from_raw_parts_mut(hash, DIGEST_SIZE).copy_from_slice(&solution.digest);
                *nonce = solution.nonce;
                GOVM_OK
            }
            Err(e) => status(&e),
        }
    }
}

unsafe fn read_key(seckey: *const u8) -> SecretKey {
    let mut key = [0u8; 32];
    key.copy_from_slice(slice::from_raw_parts(seckey, 32));
    key
}
