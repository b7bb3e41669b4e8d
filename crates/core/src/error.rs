//! Errors raised by the hashing core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovmError {
    /// The signing provider rejected the secret key or digest
    #[error("Invalid secret key: {0}")]
    InvalidKey(String),

    /// A block is too short to carry the trailing nonce field
    #[error("Block too short: {len} bytes, need at least {min}")]
    BufferTooShort { len: usize, min: usize },

    /// A fixed-size record was decoded from a buffer of the wrong length
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, GovmError>;
