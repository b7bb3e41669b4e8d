//! Nonce search: sign many nonce variants of a block, keep the strongest
//!
//! Trial `i` rewrites the block's trailing nonce to `start + i` (wrapping),
//! signs it and hashes the envelope. A trial replaces the current best only
//! when its hash power is strictly higher, so on ties the earliest nonce
//! wins. The winner is re-signed at the end rather than kept from the loop,
//! whose buffer is overwritten by every trial.

use core::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::block::{read_nonce, write_nonce};
use crate::envelope::{Envelope, RecoverableSigner, SecretKey, envelope_buffer, seal_in_place};
use crate::error::Result;
use crate::params::{DIGEST_SIZE, ENVELOPE_OVERHEAD};
use crate::power::{hash_power, is_better};
use crate::sponge::Digest;

/// Worst possible digest (hash power 0), the starting point of a search
///
/// Returned as the solution digest when no trial has power above zero.
pub const WORST_DIGEST: Digest = [0xFF; DIGEST_SIZE];

/// Best envelope found by a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Winning nonce, `start + offset`
    pub nonce: u64,
    /// Envelope re-signed for the winning nonce
    pub envelope: Envelope,
    /// Outer digest of the winner, or `WORST_DIGEST` if no trial improved
    /// on it
    pub digest: Digest,
}

impl Solution {
    pub fn hash_power(&self) -> u32 {
        hash_power(&self.digest)
    }
}

/// Search `trials` consecutive nonces starting at the block's own nonce
///
/// With `trials == 0` the block is signed unchanged. When no trial has
/// power above zero the nonce stays at the start and the digest is
/// `WORST_DIGEST`.
///
/// # Errors
///
/// `BufferTooShort` if the block has no room for a nonce; signing errors
/// abort the search.
pub fn find_best<S: RecoverableSigner + ?Sized>(
    block: &[u8],
    secret_key: &SecretKey,
    signer: &S,
    trials: u64,
) -> Result<Solution> {
    let start = read_nonce(block)?;
    let mut buf = envelope_buffer(block);

    let best = scan(&mut buf, start, 0..trials, secret_key, signer)?;
    finish(buf, start, best, secret_key, signer)
}

/// Parallel `find_best`
///
/// The trial range is split into contiguous sub-ranges, one working buffer
/// per sub-range. Sub-range winners are merged in nonce order with the same
/// strict comparison, so deterministic signers give the same result as
/// `find_best`.
#[cfg(feature = "parallel")]
pub fn find_best_parallel<S: RecoverableSigner + Sync + ?Sized>(
    block: &[u8],
    secret_key: &SecretKey,
    signer: &S,
    trials: u64,
) -> Result<Solution> {
    let start = read_nonce(block)?;
    let template = envelope_buffer(block);

    let workers = rayon::current_num_threads().max(1) as u64;
    let span = trials.div_ceil(workers).max(1);
    let ranges: Vec<Range<u64>> = (0..trials)
        .step_by(span as usize)
        .map(|lo| lo..lo.saturating_add(span).min(trials))
        .collect();

    let partials = ranges
        .into_par_iter()
        .map(|range| {
            let mut buf = template.clone();
            scan(&mut buf, start, range, secret_key, signer)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut best: Option<(u64, Digest)> = None;
    for (offset, digest) in partials.into_iter().flatten() {
        let current = best.map_or(WORST_DIGEST, |(_, d)| d);
        if is_better(&digest, &current) {
            best = Some((offset, digest));
        }
    }

    finish(template, start, best, secret_key, signer)
}

/// Run trials `range` against `buf`, returning the strict improvement over
/// the worst digest, if any
fn scan<S: RecoverableSigner + ?Sized>(
    buf: &mut [u8],
    start: u64,
    range: Range<u64>,
    secret_key: &SecretKey,
    signer: &S,
) -> Result<Option<(u64, Digest)>> {
    let mut best: Option<(u64, Digest)> = None;
    let mut best_digest = WORST_DIGEST;

    for offset in range {
        write_nonce(&mut buf[ENVELOPE_OVERHEAD..], start.wrapping_add(offset))?;
        let digest = seal_in_place(buf, secret_key, signer)?;

        if is_better(&digest, &best_digest) {
            best_digest = digest;
            best = Some((offset, digest));
        }
    }

    Ok(best)
}

/// Re-sign the winning nonce into `buf` and build the solution
fn finish<S: RecoverableSigner + ?Sized>(
    mut buf: Vec<u8>,
    start: u64,
    best: Option<(u64, Digest)>,
    secret_key: &SecretKey,
    signer: &S,
) -> Result<Solution> {
    let offset = best.map_or(0, |(offset, _)| offset);
    let nonce = start.wrapping_add(offset);

    write_nonce(&mut buf[ENVELOPE_OVERHEAD..], nonce)?;
    seal_in_place(&mut buf, secret_key, signer)?;

    Ok(Solution {
        nonce,
        envelope: Envelope::from_bytes(buf)?,
        digest: best.map_or(WORST_DIGEST, |(_, digest)| digest),
    })
}
