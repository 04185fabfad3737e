//! In-Memory Store Module
//!
//! A process-local stand-in for Redis honouring the same primitive contract:
//! per-entry expiry, FLUSHALL, and MULTI/EXEC/DISCARD around deletes.

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::Store;

// == Store Entry ==
/// A stored value with its expiration timestamp.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl StoreEntry {
    /// Creates an entry expiring `ttl_seconds` from now.
    pub fn new(value: Vec<u8>, ttl_seconds: u64) -> Self {
        let expires_at = current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000));
        Self { value, expires_at }
    }

    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    /// Remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Memory Store ==
/// In-process store with Redis-like expiry and transaction semantics.
///
/// Every primitive call is appended to a command log, which lets tests
/// assert that rejected calls never reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoreEntry>,
    /// Keys queued for deletion while a transaction is open
    queued: Option<Vec<String>>,
    /// Keys whose deletion is made to fail
    failing_deletes: HashSet<String>,
    /// Commands made to fail whatever their key
    failing_commands: HashSet<String>,
    commands: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `del` of `key` fail with a store error.
    pub fn fail_on_delete(&mut self, key: impl Into<String>) {
        self.failing_deletes.insert(key.into());
    }

    /// Makes every later call of `command` (`"GET"`, `"DISCARD"`, ...) fail
    /// with a store error. The call is still logged.
    pub fn fail_on(&mut self, command: &str) {
        self.failing_commands.insert(command.to_ascii_uppercase());
    }

    /// Names of the primitives invoked so far, in order (`"SETEX key"`, ...).
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Forgets the command log.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Returns true while a MULTI block is open.
    pub fn in_transaction(&self) -> bool {
        self.queued.is_some()
    }

    /// Number of live entries.
    pub fn len(&mut self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Remaining TTL of `key` in milliseconds, if it is live.
    pub fn ttl_remaining_ms(&mut self, key: &str) -> Option<u64> {
        self.live(key).map(StoreEntry::ttl_remaining_ms)
    }

    /// Logs the call, then fails it if `command` was set up to fail.
    fn record(&mut self, command: &str, key: &str) -> Result<()> {
        if key.is_empty() {
            self.commands.push(command.to_string());
        } else {
            self.commands.push(format!("{} {}", command, key));
        }
        if self.failing_commands.contains(command) {
            return Err(CacheError::Store(format!("{} rejected", command)));
        }
        Ok(())
    }

    /// Looks up a live entry, dropping it first if it has expired.
    fn live(&mut self, key: &str) -> Option<&StoreEntry> {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
        }
        self.entries.get(key)
    }

    fn purge_expired(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Memory store purged {} expired entries", removed);
        }
    }
}

impl Store for MemoryStore {
    fn exists(&mut self, key: &str) -> Result<i64> {
        self.record("EXISTS", key)?;
        Ok(i64::from(self.live(key).is_some()))
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        self.record("GET", key)?;
        Ok(self.live(key).map(|entry| entry.value.clone()))
    }

    fn set_ex(&mut self, key: &str, value: &[u8], seconds: u64) -> Result<()> {
        self.record("SETEX", key)?;
        if seconds == 0 {
            return Err(CacheError::Store(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }
        self.entries
            .insert(key.to_string(), StoreEntry::new(value.to_vec(), seconds));
        Ok(())
    }

    fn del(&mut self, key: &str) -> Result<()> {
        self.record("DEL", key)?;
        if self.failing_deletes.contains(key) {
            return Err(CacheError::Store(format!("DEL rejected for '{}'", key)));
        }
        match self.queued.as_mut() {
            Some(queue) => queue.push(key.to_string()),
            None => {
                self.entries.remove(key);
            }
        }
        Ok(())
    }

    fn flush_all(&mut self) -> Result<String> {
        self.record("FLUSHALL", "")?;
        self.entries.clear();
        Ok("OK".to_string())
    }

    fn multi(&mut self) -> Result<()> {
        self.record("MULTI", "")?;
        if self.queued.is_some() {
            return Err(CacheError::Store("MULTI calls can not be nested".to_string()));
        }
        self.queued = Some(Vec::new());
        Ok(())
    }

    fn exec(&mut self) -> Result<()> {
        self.record("EXEC", "")?;
        let queue = self
            .queued
            .take()
            .ok_or_else(|| CacheError::Store("EXEC without MULTI".to_string()))?;
        for key in queue {
            self.entries.remove(&key);
        }
        Ok(())
    }

    fn discard(&mut self) -> Result<()> {
        self.record("DISCARD", "")?;
        self.queued
            .take()
            .map(|_| ())
            .ok_or_else(|| CacheError::Store("DISCARD without MULTI".to_string()))
    }
}
