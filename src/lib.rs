//! GOVM Miner Library
//!
//! Proof-of-work candidate selection for GOVM blocks.
//!
//! # Overview
//!
//! A block template is signed with secp256k1 for many nonce values; each
//! signed envelope is hashed with the `"govm"`-tagged SHA3-256 and the one
//! with the most leading zero bits wins.
//!
//! # Example
//!
//! ```rust
//! use govm::algorithm::{find_best, BlockHeader};
//! use govm::signer::Secp256k1Signer;
//!
//! let block = BlockHeader::default().encode();
//! let key = [0x42u8; 32];
//! let signer = Secp256k1Signer::with_key(&key).unwrap();
//!
//! let solution = find_best(&block, &key, &signer, 16).unwrap();
//! println!("nonce {} has hash power {}", solution.nonce, solution.hash_power());
//! ```

// Re-export the core algorithm
pub use govm_core as algorithm;

pub mod config;
pub mod ffi;
pub mod logging;
pub mod miner;
pub mod signer;

// Convenience re-exports
pub use algorithm::{domain_hash, find_best, hash_power, sign_block, Solution};
pub use config::MinerConfig;
pub use miner::{Miner, MiningReport};
pub use signer::Secp256k1Signer;
