//! C FFI bindings for the hash-only entry points

use core::slice;

use crate::params::DIGEST_SIZE;
use crate::{domain_hash, hash_power};

/// Domain hash of input data
/// - data: pointer to input bytes (may be null when len is 0)
/// - len: length of input
/// - hash: pointer to 32-byte buffer for result
///
/// Returns 0 on success, -1 on a null pointer.
#[unsafe(no_mangle)]
pub extern "C" fn govm_sha3(data: *const u8, len: usize, hash: *mut u8) -> i32 {
    if hash.is_null() || (data.is_null() && len > 0) {
        return -1;
    }

    unsafe {
        let input = if len == 0 {
            &[][..]
        } else {
            slice::from_raw_parts(data, len)
        };
        let digest = domain_hash(input);
        slice::from_raw_parts_mut(hash, DIGEST_SIZE).copy_from_slice(&digest);
    }
    0
}

/// Leading zero bits of `length` bytes at `input`
#[unsafe(no_mangle)]
pub extern "C" fn govm_hash_power(input: *const u8, length: usize) -> usize {
    if input.is_null() || length == 0 {
        return 0;
    }

    let bytes = unsafe { slice::from_raw_parts(input, length) };
    hash_power(bytes) as usize
}

/// Compare two 32-byte digests by hash power
///
/// Returns -1 when `a` is stronger, 1 when `b` is stronger, 0 otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn govm_hash_compare(a: *const u8, b: *const u8) -> i32 {
    if a.is_null() || b.is_null() {
        return 0;
    }

    let (a, b) = unsafe {
        (
            slice::from_raw_parts(a, DIGEST_SIZE),
            slice::from_raw_parts(b, DIGEST_SIZE),
        )
    };
    crate::compare(a, b) as i32
}
