use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid base64url string: {0}")]
    InvalidEncoding(String),

    #[error("unsupported hash algorithm code: {0:#04x}")]
    UnsupportedAlgorithm(u64),

    #[error("invalid multihash: {0}")]
    InvalidMultihash(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
