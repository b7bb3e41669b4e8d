//! Chunked, multi-threaded mining loop
//!
//! Each worker repeatedly runs `find_best` over a chunk of consecutive
//! nonces. Worker `w` of `n` takes chunks `w, w + n, w + 2n, ...` counted
//! from the starting nonce, so workers never overlap. The stop flag is only
//! checked between chunks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use govm_core::{
    find_best, meets_hash_power, read_nonce, sign_block, write_nonce, RecoverableSigner,
    SecretKey, Solution, WORST_DIGEST,
};
use tracing::{debug, error, info};

use crate::config::MinerConfig;

/// Outcome of a mining run
#[derive(Debug, Clone)]
pub struct MiningReport {
    /// Best candidate reaching the hash power limit, if any
    pub solution: Option<Solution>,
    /// Envelopes signed and hashed across all workers, including winner
    /// re-signing and candidate verification
    pub hashes: u64,
    pub elapsed: Duration,
}

impl MiningReport {
    /// Envelopes per second
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.hashes as f64 / secs
    }
}

/// Mines one block template with a fixed key
pub struct Miner<S> {
    config: MinerConfig,
    secret_key: SecretKey,
    signer: S,
}

impl<S: RecoverableSigner + Sync> Miner<S> {
    pub fn new(config: MinerConfig, secret_key: SecretKey, signer: S) -> Self {
        Self {
            config,
            secret_key,
            signer,
        }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Mine `block` on `thread_number` workers until one finds a candidate
    /// or every worker exhausts `max_chunks`
    pub fn mine(&self, block: &[u8]) -> Result<MiningReport> {
        let start_nonce = if self.config.random_start {
            random_nonce()?
        } else {
            read_nonce(block)?
        };
        let workers = self.config.threads();
        let stop = AtomicBool::new(false);
        let hashes = AtomicU64::new(0);
        let started = Instant::now();

        info!(
            workers,
            start_nonce,
            chunk = self.config.chunk_size(),
            limit = self.config.hash_power_limit,
            "mining started"
        );

        let outcomes: Vec<Result<Option<Solution>>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let (stop, hashes) = (&stop, &hashes);
                    scope.spawn(move || {
                        self.run_worker(block, start_nonce, worker, workers, stop, hashes)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(outcome) => outcome,
                    Err(_) => Err(anyhow::anyhow!("mining worker panicked")),
                })
                .collect()
        });

        // Several workers may finish in the same round; keep the strongest,
        // lowest worker index on ties
        let mut best: Option<Solution> = None;
        for outcome in outcomes {
            if let Some(candidate) = outcome? {
                let stronger = best
                    .as_ref()
                    .map_or(true, |b| candidate.hash_power() > b.hash_power());
                if stronger {
                    best = Some(candidate);
                }
            }
        }

        let report = MiningReport {
            solution: best,
            hashes: hashes.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        };
        info!(
            found = report.solution.is_some(),
            hashes = report.hashes,
            rate = report.hash_rate(),
            "mining finished"
        );
        Ok(report)
    }

    /// One worker's chunk loop
    ///
    /// Returns the first chunk winner meeting the limit, or `None` when
    /// stopped or out of chunks. An error raises `stop` so sibling workers
    /// quit after their current chunk.
    pub fn run_worker(
        &self,
        block: &[u8],
        start_nonce: u64,
        worker: usize,
        workers: usize,
        stop: &AtomicBool,
        hashes: &AtomicU64,
    ) -> Result<Option<Solution>> {
        self.search_chunks(block, start_nonce, worker, workers, stop, hashes)
            .inspect_err(|e| {
                error!(worker, error = %format!("{:#}", e), "mining worker failed");
                stop.store(true, Ordering::Relaxed);
            })
    }

    fn search_chunks(
        &self,
        block: &[u8],
        start_nonce: u64,
        worker: usize,
        workers: usize,
        stop: &AtomicBool,
        hashes: &AtomicU64,
    ) -> Result<Option<Solution>> {
        let chunk = self.config.chunk_size();
        let stride = chunk.wrapping_mul(workers as u64);
        let mut nonce = start_nonce.wrapping_add(chunk.wrapping_mul(worker as u64));
        let mut work = block.to_vec();
        let mut chunks = 0u64;

        while !stop.load(Ordering::Relaxed) {
            if self.config.max_chunks > 0 && chunks >= self.config.max_chunks {
                break;
            }

            write_nonce(&mut work, nonce)?;
            let solution = find_best(&work, &self.secret_key, &self.signer, chunk)
                .context("nonce search failed")?;
            // Every trial plus the re-signed winner
            hashes.fetch_add(chunk + 1, Ordering::Relaxed);
            chunks += 1;

            debug!(
                worker,
                nonce,
                power = solution.hash_power(),
                "chunk searched"
            );

            if meets_hash_power(&solution.digest, self.config.hash_power_limit) {
                if self.config.verify_candidates {
                    hashes.fetch_add(1, Ordering::Relaxed);
                    self.verify(&solution)?;
                }
                info!(
                    worker,
                    nonce = solution.nonce,
                    power = solution.hash_power(),
                    digest = %hex::encode(solution.digest),
                    "found candidate"
                );
                stop.store(true, Ordering::Relaxed);
                return Ok(Some(solution));
            }

            nonce = nonce.wrapping_add(stride);
            if self.config.chunk_sleep_msec > 0 {
                thread::sleep(Duration::from_millis(self.config.chunk_sleep_msec));
            }
        }

        Ok(None)
    }

    /// Re-sign the candidate's block from scratch and compare
    ///
    /// A `WORST_DIGEST` solution (no trial had power above zero) is only
    /// checked against its envelope.
    pub fn verify(&self, solution: &Solution) -> Result<()> {
        let (envelope, digest) =
            sign_block(solution.envelope.block(), &self.secret_key, &self.signer)?;
        let digest_matches = solution.digest == WORST_DIGEST || digest == solution.digest;

        if envelope != solution.envelope || !digest_matches {
            error!(
                nonce = solution.nonce,
                expected = %hex::encode(solution.digest),
                actual = %hex::encode(digest),
                "candidate verification failed"
            );
            bail!("candidate for nonce {} failed verification", solution.nonce);
        }
        Ok(())
    }
}

/// Random starting nonce
pub fn random_nonce() -> Result<u64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom failed: {}", e))?;
    Ok(u64::from_be_bytes(bytes))
}
