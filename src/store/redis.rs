//! Redis Store Module
//!
//! Forwards each primitive to a single raw Redis command over a blocking
//! connection.

use redis::{Client, Connection};
use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::Store;

// == Redis Store ==
/// Store backed by a blocking Redis connection.
pub struct RedisStore {
    connection: Connection,
}

impl RedisStore {
    // == Constructors ==
    /// Wraps an already established connection.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Connects to the server at `url` and verifies it answers PING.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    pub fn open(url: &str) -> Result<Self> {
        info!("Connecting to Redis at {}", url);

        let client = Client::open(url)?;
        let mut connection = client.get_connection()?;

        let pong: String = redis::cmd("PING").query(&mut connection)?;
        if pong != "PONG" {
            return Err(CacheError::Store(format!(
                "Redis at {} answered PING with '{}'",
                url, pong
            )));
        }

        info!("Redis connection established");
        Ok(Self::new(connection))
    }

    /// Connects using the URL from the configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::open(&config.redis_url)
    }
}

/// Logs a failed command before handing the error back unchanged.
fn logged<T>(command: &str, key: &str, result: redis::RedisResult<T>) -> Result<T> {
    result.map_err(|e| {
        warn!("Redis {} failed for '{}': {}", command, key, e);
        CacheError::Redis(e)
    })
}

impl Store for RedisStore {
    fn exists(&mut self, key: &str) -> Result<i64> {
        logged(
            "EXISTS",
            key,
            redis::cmd("EXISTS").arg(key).query(&mut self.connection),
        )
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        logged(
            "GET",
            key,
            redis::cmd("GET").arg(key).query(&mut self.connection),
        )
    }

    fn set_ex(&mut self, key: &str, value: &[u8], seconds: u64) -> Result<()> {
        logged(
            "SETEX",
            key,
            redis::cmd("SETEX")
                .arg(key)
                .arg(seconds)
                .arg(value)
                .query(&mut self.connection),
        )
    }

    fn del(&mut self, key: &str) -> Result<()> {
        logged(
            "DEL",
            key,
            redis::cmd("DEL").arg(key).query(&mut self.connection),
        )
    }

    fn flush_all(&mut self) -> Result<String> {
        logged(
            "FLUSHALL",
            "*",
            redis::cmd("FLUSHALL").query(&mut self.connection),
        )
    }

    fn multi(&mut self) -> Result<()> {
        logged("MULTI", "", redis::cmd("MULTI").query(&mut self.connection))
    }

    fn exec(&mut self) -> Result<()> {
        // Only EXEC's own error surfaces; per-command errors in its reply array are not inspected.
        logged("EXEC", "", redis::cmd("EXEC").query(&mut self.connection))
    }

    fn discard(&mut self) -> Result<()> {
        logged(
            "DISCARD",
            "",
            redis::cmd("DISCARD").query(&mut self.connection),
        )
    }
}
