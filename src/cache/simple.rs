//! Simple Cache Module
//!
//! The cache interface itself: validates keys, resolves TTLs, encodes values
//! and forwards to the store primitives.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::batch::run_transaction;
use crate::cache::codec::{Codec, JsonCodec};
use crate::cache::key::{validate_key, validate_keys};
use crate::cache::ttl::{resolve_ttl, Ttl};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::store::Store;

// == Simple Cache ==
/// Key-value cache with TTL expiry over an injected store.
///
/// Every operation validates its keys before contacting the store, so an
/// invalid key never costs a round trip.
#[derive(Debug)]
pub struct SimpleCache<S, C = JsonCodec> {
    store: S,
    codec: C,
    /// TTL in seconds applied when a write carries none
    default_ttl: i64,
}

impl<S: Store> SimpleCache<S> {
    // == Constructors ==
    /// Creates a cache using the JSON codec.
    ///
    /// # Arguments
    /// * `store` - The store holding the cached data
    /// * `default_ttl` - TTL in seconds for writes without an explicit TTL
    pub fn new(store: S, default_ttl: i64) -> Self {
        Self::with_codec(store, JsonCodec, default_ttl)
    }

    /// Creates a cache from configuration.
    pub fn from_config(store: S, config: &CacheConfig) -> Self {
        Self::new(store, config.default_ttl)
    }
}

impl<S: Store, C: Codec> SimpleCache<S, C> {
    pub fn with_codec(store: S, codec: C, default_ttl: i64) -> Self {
        Self {
            store,
            codec,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // == Get ==
    /// Fetches and decodes the value under `key`, or `None` if absent.
    ///
    /// Presence is checked with EXISTS before the GET.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;

        if self.store.exists(key)? != 1 {
            debug!("Cache miss for '{}'", key);
            return Ok(None);
        }

        // Expired between the two round trips
        let Some(bytes) = self.store.get(key)? else {
            debug!("Cache entry '{}' expired before fetch", key);
            return Ok(None);
        };
        self.codec.decode(&bytes).map(Some)
    }

    /// Like [`get`](Self::get), returning `default` when the key is absent.
    pub fn get_or<T: DeserializeOwned>(&mut self, key: &str, default: T) -> Result<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// Without a TTL the default applies. A TTL that resolves to zero or less
    /// deletes the key instead of writing it.
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Option<Ttl>,
    ) -> Result<()> {
        validate_key(key)?;
        let seconds = resolve_ttl(ttl.as_ref(), self.default_ttl)?;
        self.write(key, value, seconds)
    }

    /// Writes an already validated key with an already resolved TTL.
    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T, seconds: i64) -> Result<()> {
        if seconds <= 0 {
            debug!("TTL {}s for '{}' is not positive, deleting", seconds, key);
            return self.store.del(key);
        }

        let bytes = self.codec.encode(value)?;
        debug!("Setting '{}' ({} bytes) for {}s", key, bytes.len(), seconds);
        // seconds > 0 was checked above
        self.store.set_ex(key, &bytes, seconds.unsigned_abs())
    }

    // == Delete ==
    /// Removes `key`; succeeds whether or not it existed.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        debug!("Deleting '{}'", key);
        self.store.del(key)
    }

    // == Clear ==
    /// Flushes the whole store; true if the store acknowledged.
    pub fn clear(&mut self) -> Result<bool> {
        let reply = self.store.flush_all()?;
        let acknowledged = reply == "OK";
        info!("Cache cleared (reply: {})", reply);
        Ok(acknowledged)
    }

    // == Has ==
    /// True only if the store reports exactly one live entry for `key`.
    pub fn has(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.store.exists(key)? == 1)
    }

    // == Get Multiple ==
    /// Fetches every key in `keys`, mapping absent ones to `default`.
    ///
    /// All keys are validated before the first fetch.
    pub fn get_multiple<I, K, T>(&mut self, keys: I, default: T) -> Result<HashMap<String, T>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        T: DeserializeOwned + Clone,
    {
        let keys = validate_keys(keys)?;
        debug!("Fetching {} keys", keys.len());

        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            let value = match self.store.get(&key)? {
                Some(bytes) => self.codec.decode(&bytes)?,
                None => default.clone(),
            };
            values.insert(key, value);
        }
        Ok(values)
    }

    // == Set Multiple ==
    /// Stores every (key, value) pair with the same TTL.
    ///
    /// Keys are validated and the TTL resolved once, before the first write.
    pub fn set_multiple<I, K, T>(&mut self, values: I, ttl: Option<Ttl>) -> Result<()>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Serialize,
    {
        let pairs: Vec<(K, T)> = values.into_iter().collect();
        for (key, _) in &pairs {
            validate_key(key.as_ref())?;
        }
        let seconds = resolve_ttl(ttl.as_ref(), self.default_ttl)?;
        debug!("Setting {} keys for {}s", pairs.len(), seconds);

        for (key, value) in &pairs {
            self.write(key.as_ref(), value, seconds)?;
        }
        Ok(())
    }

    // == Delete Multiple ==
    /// Removes every key in `keys` inside one transaction.
    ///
    /// If any delete fails the transaction is discarded and the error
    /// returned; nothing is removed.
    pub fn delete_multiple<I, K>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys = validate_keys(keys)?;
        debug!("Deleting {} keys", keys.len());

        run_transaction(&mut self.store, |tx| {
            for key in &keys {
                tx.del(key)?;
            }
            Ok(())
        })
    }
}
