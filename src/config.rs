//! Configuration Module
//!
//! Handles loading the adapter configuration from environment variables.

use std::env;

/// Default TTL in seconds when none is configured
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Redis URL used when none is configured
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Cache adapter configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default TTL in seconds for writes without an explicit TTL
    pub default_ttl: i64,
    /// Connection URL of the Redis server
    pub redis_url: String,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379)
    pub fn from_env() -> Self {
        Self {
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
        }
    }

    /// Overrides the default TTL.
    pub fn with_default_ttl(mut self, seconds: i64) -> Self {
        self.default_ttl = seconds;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL_SECS,
            redis_url: DEFAULT_REDIS_URL.to_string(),
        }
    }
}
