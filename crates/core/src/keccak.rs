//! Keccak-f[1600] permutation
//!
//! The 25-lane state is mixed in place by 24 rounds of theta, rho/pi, chi
//! and iota. Lane `x + 5 * y` holds column `x` of row `y`.

use crate::params::{KECCAK_ROUNDS, STATE_WORDS};

/// Iota round constants, one per round
const ROUND_CONSTANTS: [u64; KECCAK_ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Rho rotation amounts, in pi visiting order
const RHO_OFFSETS: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Pi lane visiting order starting from lane 1
const PI_LANES: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// Apply the full 24-round Keccak-f[1600] permutation to `state`
#[inline]
pub fn keccak_f(state: &mut [u64; STATE_WORDS]) {
    for &round_constant in ROUND_CONSTANTS.iter() {
        round(state, round_constant);
    }
}

#[inline(always)]
fn round(st: &mut [u64; STATE_WORDS], round_constant: u64) {
    let mut bc = [0u64; 5];

    // Theta
    for (x, parity) in bc.iter_mut().enumerate() {
        *parity = st[x] ^ st[x + 5] ^ st[x + 10] ^ st[x + 15] ^ st[x + 20];
    }
    for x in 0..5 {
        let t = bc[(x + 4) % 5] ^ bc[(x + 1) % 5].rotate_left(1);
        for y in (0..25).step_by(5) {
            st[y + x] ^= t;
        }
    }

    // Rho + Pi: carry one lane through the 24-step swap chain
    let mut carried = st[1];
    for (&lane, &offset) in PI_LANES.iter().zip(RHO_OFFSETS.iter()) {
        let next = st[lane];
        st[lane] = carried.rotate_left(offset);
        carried = next;
    }

    // Chi
    for y in (0..25).step_by(5) {
        let row = [st[y], st[y + 1], st[y + 2], st[y + 3], st[y + 4]];
        for x in 0..5 {
            st[y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
        }
    }

    // Iota
    st[0] ^= round_constant;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_matches_reference_lanes() {
        // Keccak team intermediate values for Keccak-f[1600] on the zero state
        let mut state = [0u64; STATE_WORDS];
        keccak_f(&mut state);
        assert_eq!(state[0], 0xF1258F7940E1DDE7);
        assert_eq!(state[1], 0x84D5CCF933C0478A);
    }

    #[test]
    fn permutation_is_not_identity_on_single_bit() {
        let mut a = [0u64; STATE_WORDS];
        let mut b = [0u64; STATE_WORDS];
        b[24] = 1 << 63;
        keccak_f(&mut a);
        keccak_f(&mut b);

        let diff: u32 = a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum();
        assert!(diff > 600, "single-bit change diffused to only {} bits", diff);
    }
}
