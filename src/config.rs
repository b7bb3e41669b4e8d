//! Miner configuration
//!
//! Loaded from a JSON file; every field is optional.
//!
//! ```json
//! {
//!   "secret_key": "<64 hex chars>",
//!   "thread_number": 4,
//!   "chunk_hashes": 256,
//!   "chunk_sleep_msec": 0,
//!   "hash_power_limit": 20,
//!   "verbosity": 2
//! }
//! ```

use std::fs;
use std::path::Path;

use govm_core::SecretKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trials per `find_best` call when `chunk_hashes` is 0
pub const DEFAULT_CHUNK_HASHES: u64 = 256;

/// Default target hash power
pub const DEFAULT_HASH_POWER_LIMIT: u32 = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No secret key configured")]
    MissingKey,

    #[error("Invalid secret key: {0}")]
    InvalidKey(String),
}

/// Mining knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Hex-encoded 32-byte secp256k1 secret key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Worker threads, 0 = one per CPU
    pub thread_number: usize,
    /// Nonces tried per search call
    pub chunk_hashes: u64,
    /// Pause between search calls
    pub chunk_sleep_msec: u64,
    /// Stop once a winner reaches this many leading zero bits
    pub hash_power_limit: u32,
    /// Search calls per worker, 0 = until a candidate is found
    pub max_chunks: u64,
    /// Start workers at a random nonce instead of the block's own
    pub random_start: bool,
    /// Re-sign every candidate independently before accepting it
    pub verify_candidates: bool,
    /// 0 = errors only ... 4 = trace
    pub verbosity: u8,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            thread_number: 0,
            chunk_hashes: DEFAULT_CHUNK_HASHES,
            chunk_sleep_msec: 0,
            hash_power_limit: DEFAULT_HASH_POWER_LIMIT,
            max_chunks: 0,
            random_start: true,
            verify_candidates: true,
            verbosity: 2,
        }
    }
}

impl MinerConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the configured secret key
    pub fn secret_key_bytes(&self) -> Result<SecretKey, ConfigError> {
        let encoded = self.secret_key.as_deref().ok_or(ConfigError::MissingKey)?;
        parse_secret_key(encoded)
    }

    /// Effective worker count
    pub fn threads(&self) -> usize {
        if self.thread_number == 0 {
            num_cpus::get()
        } else {
            self.thread_number
        }
    }

    /// Effective trials per search call
    pub fn chunk_size(&self) -> u64 {
        if self.chunk_hashes == 0 {
            DEFAULT_CHUNK_HASHES
        } else {
            self.chunk_hashes
        }
    }
}

/// Decode a hex secret key, with or without a `0x` prefix
pub fn parse_secret_key(encoded: &str) -> Result<SecretKey, ConfigError> {
    let trimmed = encoded.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(trimmed).map_err(|e| ConfigError::InvalidKey(e.to_string()))?;

    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ConfigError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = MinerConfig::from_json("{}").unwrap();
        assert_eq!(config, MinerConfig::default());
        assert_eq!(config.chunk_size(), 256);
        assert!(config.threads() >= 1);
        assert!(matches!(config.secret_key_bytes(), Err(ConfigError::MissingKey)));
    }

    #[test]
    fn test_parse_fields() {
        let json = r#"{
            "secret_key": "0x0101010101010101010101010101010101010101010101010101010101010101",
            "thread_number": 3,
            "chunk_hashes": 0,
            "chunk_sleep_msec": 5,
            "hash_power_limit": 12,
            "verbosity": 4
        }"#;
        let config = MinerConfig::from_json(json).unwrap();

        assert_eq!(config.threads(), 3);
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_HASHES);
        assert_eq!(config.chunk_sleep_msec, 5);
        assert_eq!(config.hash_power_limit, 12);
        assert_eq!(config.verbosity, 4);
        assert_eq!(config.secret_key_bytes().unwrap(), [1u8; 32]);
    }

    #[test]
    fn test_bad_keys() {
        assert!(matches!(parse_secret_key("zz"), Err(ConfigError::InvalidKey(_))));
        assert!(matches!(parse_secret_key("0102"), Err(ConfigError::InvalidKey(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("govm-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"chunk_hashes": 64}"#).unwrap();

        let config = MinerConfig::load_from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.chunk_size(), 64);

        assert!(matches!(
            MinerConfig::load_from_file(Path::new("/nonexistent/govm.json")),
            Err(ConfigError::FileError(_))
        ));
    }
}
