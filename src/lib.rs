//! Redis Simple Cache - A simple cache interface backed by Redis
//!
//! Provides get/set/delete/clear/has with bulk variants and TTL expiry,
//! forwarding to a Redis connection or any other [`Store`].

pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{Codec, Interval, JsonCodec, SimpleCache, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use store::{MemoryStore, RedisStore, Store};
