//! Hash power: the number of leading zero bits of a digest
//!
//! Candidates are ranked by hash power alone. Two digests with the same
//! power compare equal whatever their remaining bits, so the first of them
//! found during a search keeps its place.

use core::cmp::Ordering;

/// Count leading zero bits, reading bytes most-significant first
///
/// An all-zero input has power `8 * digest.len()`.
///
/// # Example
///
/// ```rust
/// use govm_core::hash_power;
///
/// assert_eq!(hash_power(&[0x00, 0x0F, 0xFF]), 12);
/// assert_eq!(hash_power(&[0x01, 0x00]), 7);
/// ```
#[inline(always)]
pub fn hash_power(digest: &[u8]) -> u32 {
    let mut power = 0u32;

    for byte in digest.iter() {
        if *byte == 0 {
            power += 8;
        } else {
            power += byte.leading_zeros();
            break;
        }
    }

    power
}

/// Rank two digests by hash power
///
/// Higher power sorts first: `Less` means `a` is the better candidate.
#[inline]
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    hash_power(b).cmp(&hash_power(a))
}

/// True when `a` has strictly more hash power than `b`
#[inline]
pub fn is_better(a: &[u8], b: &[u8]) -> bool {
    compare(a, b) == Ordering::Less
}

/// Check whether a digest reaches a required hash power
#[inline]
pub fn meets_hash_power(digest: &[u8], limit: u32) -> bool {
    hash_power(digest) >= limit
}
