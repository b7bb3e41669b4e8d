//! # GOVM Block Hashing Core
//!
//! Proof-of-work selection for GOVM blocks: a block is signed for many
//! nonce values and the envelope whose digest has the most leading zero
//! bits ("hash power") wins.
//!
//! ## Components
//!
//! - **Keccak-f[1600]** permutation and a streaming **SHA3-256** sponge
//! - **Domain hash**: `SHA3-256("govm" || payload)`
//! - **Envelopes**: `0x41 || 31 + recid || r || s || block`, signed by an
//!   injected [`RecoverableSigner`]
//! - **Hash power** metric and the nonce search built on it
//!
//! ## Block Format
//!
//! The search only touches the **last 8 bytes** of a block:
//!
//! ```text
//! block = payload || nonce
//!         ^^^^^^^    ^^^^^
//!         any len    8 bytes (big-endian u64)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use govm_core::{domain_hash, hash_power, meets_hash_power};
//!
//! let digest = domain_hash(b"block bytes");
//! if meets_hash_power(&digest, 16) {
//!     println!("digest has {} leading zero bits", hash_power(&digest));
//! }
//! ```

mod block;
mod envelope;
mod error;
mod ffi;
mod keccak;
mod params;
mod power;
mod search;
mod sponge;

pub use block::{Address, BlockHeader, Hash, read_nonce, write_nonce};
pub use envelope::{
    CompactSignature, Envelope, RecoverableSigner, SecretKey, domain_hash, domain_hasher,
    sign_block,
};
pub use error::{GovmError, Result};
pub use keccak::keccak_f;
pub use params::*;
pub use power::{compare, hash_power, is_better, meets_hash_power};
#[cfg(feature = "parallel")]
pub use search::find_best_parallel;
pub use search::{Solution, WORST_DIGEST, find_best};
pub use sponge::{Digest, Sha3_256, sha3_256};
