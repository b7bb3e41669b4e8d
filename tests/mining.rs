//! Mining loop behaviour

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use govm::algorithm::{
    meets_hash_power, BlockHeader, CompactSignature, Digest, GovmError, RecoverableSigner,
    SecretKey,
};
use govm::{Miner, MinerConfig, Secp256k1Signer};

const KEY: [u8; 32] = [0x42; 32];

fn miner(config: MinerConfig) -> Miner<Secp256k1Signer> {
    Miner::new(config, KEY, Secp256k1Signer::with_key(&KEY).unwrap())
}

fn template(nonce: u64) -> Vec<u8> {
    BlockHeader {
        index: 5,
        nonce,
        ..Default::default()
    }
    .encode()
}

#[test]
fn test_mine_finds_easy_candidate() {
    let config = MinerConfig {
        thread_number: 2,
        chunk_hashes: 8,
        hash_power_limit: 1,
        max_chunks: 64,
        random_start: false,
        ..Default::default()
    };
    let report = miner(config).mine(&template(0)).unwrap();

    let solution = report.solution.expect("limit of 1 bit is met almost immediately");
    assert!(meets_hash_power(&solution.digest, 1));
    assert_eq!(solution.envelope.nonce().unwrap(), solution.nonce);
    assert!(report.hashes >= 8);
}

#[test]
fn test_mine_stops_after_max_chunks() {
    let config = MinerConfig {
        thread_number: 2,
        chunk_hashes: 4,
        hash_power_limit: 256,
        max_chunks: 2,
        random_start: false,
        verify_candidates: false,
        ..Default::default()
    };
    let report = miner(config).mine(&template(0)).unwrap();

    assert!(report.solution.is_none());
    // Two workers, two chunks each, four trials plus the re-signed winner
    assert_eq!(report.hashes, 2 * 2 * (4 + 1));
}

#[test]
fn test_worker_takes_its_own_chunk() {
    let config = MinerConfig {
        chunk_hashes: 8,
        hash_power_limit: 0,
        random_start: false,
        ..Default::default()
    };
    let miner = miner(config);
    let stop = AtomicBool::new(false);
    let hashes = AtomicU64::new(0);

    let solution = miner
        .run_worker(&template(100), 100, 1, 2, &stop, &hashes)
        .unwrap()
        .unwrap();

    assert!((108..116).contains(&solution.nonce));
    assert!(stop.load(Ordering::Relaxed));
    // Eight trials, the re-signed winner and the verification signature
    assert_eq!(hashes.load(Ordering::Relaxed), 8 + 1 + 1);
    miner.verify(&solution).unwrap();
}

#[test]
fn test_raised_stop_flag_skips_work() {
    let miner = miner(MinerConfig::default());
    let stop = AtomicBool::new(true);
    let hashes = AtomicU64::new(0);

    let outcome = miner
        .run_worker(&template(0), 0, 0, 1, &stop, &hashes)
        .unwrap();
    assert!(outcome.is_none());
    assert_eq!(hashes.load(Ordering::Relaxed), 0);
}

/// Signs normally until its call budget runs out
struct ExhaustibleSigner {
    inner: Secp256k1Signer,
    calls: AtomicUsize,
    budget: usize,
}

impl RecoverableSigner for ExhaustibleSigner {
    fn sign_recoverable(
        &self,
        digest: &Digest,
        secret_key: &SecretKey,
    ) -> govm::algorithm::Result<CompactSignature> {
        if self.calls.fetch_add(1, Ordering::Relaxed) >= self.budget {
            return Err(GovmError::InvalidKey("signer exhausted".into()));
        }
        self.inner.sign_recoverable(digest, secret_key)
    }
}

#[test]
fn test_worker_failure_stops_other_workers() {
    let config = MinerConfig {
        thread_number: 2,
        chunk_hashes: 4,
        hash_power_limit: 256,
        max_chunks: 0,
        random_start: false,
        ..Default::default()
    };
    let signer = ExhaustibleSigner {
        inner: Secp256k1Signer::with_key(&KEY).unwrap(),
        calls: AtomicUsize::new(0),
        budget: 20,
    };
    let miner = Miner::new(config, KEY, signer);

    // Unlimited chunks and an unreachable limit: only the failure ends the run
    let err = miner.mine(&template(0)).unwrap_err();
    assert!(format!("{:#}", err).contains("signer exhausted"));
}

#[test]
fn test_failed_worker_raises_stop_flag() {
    let config = MinerConfig {
        chunk_hashes: 4,
        hash_power_limit: 256,
        random_start: false,
        ..Default::default()
    };
    let signer = ExhaustibleSigner {
        inner: Secp256k1Signer::with_key(&KEY).unwrap(),
        calls: AtomicUsize::new(0),
        budget: 0,
    };
    let miner = Miner::new(config, KEY, signer);
    let stop = AtomicBool::new(false);
    let hashes = AtomicU64::new(0);

    assert!(miner
        .run_worker(&template(0), 0, 0, 2, &stop, &hashes)
        .is_err());
    assert!(stop.load(Ordering::Relaxed));
    assert_eq!(hashes.load(Ordering::Relaxed), 0);
}
