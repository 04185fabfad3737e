//! Error types for the cache adapter
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache adapter.
///
/// Validation errors are raised before any store access. Store errors are
/// carried unchanged from the underlying client.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or contains an illegal character
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// TTL could not be parsed or resolved
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Value could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(String),

    /// Failure reported by the Redis client or server
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Failure reported by any other store implementation
    #[error("Store error: {0}")]
    Store(String),
}

impl CacheError {
    /// Returns true for errors raised locally before the store was contacted.
    pub fn is_validation(&self) -> bool {
        matches!(self, CacheError::InvalidKey(_) | CacheError::InvalidTtl(_))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Codec(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache adapter.
pub type Result<T> = std::result::Result<T, CacheError>;
