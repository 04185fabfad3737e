//! Store Module
//!
//! The primitive remote operations the cache adapter is built on, plus a
//! Redis-backed implementation and an in-process one for tests.

mod memory;
mod redis;

pub use memory::{MemoryStore, StoreEntry};
pub use self::redis::RedisStore;

use crate::error::Result;

// == Store ==
/// Primitive operations of a remote key-value store.
///
/// Each method is one blocking round trip. Errors are returned as reported
/// by the store; implementations never retry.
pub trait Store {
    /// Number of live entries matching `key` (0 or 1).
    fn exists(&mut self, key: &str) -> Result<i64>;

    /// Raw bytes stored under `key`, if any.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `value` under `key`, expiring after `seconds`.
    fn set_ex(&mut self, key: &str, value: &[u8], seconds: u64) -> Result<()>;

    /// Removes `key`; succeeds whether or not it existed.
    fn del(&mut self, key: &str) -> Result<()>;

    /// Removes every key; returns the store's status reply.
    fn flush_all(&mut self) -> Result<String>;

    /// Starts a transaction; following commands are queued.
    fn multi(&mut self) -> Result<()>;

    /// Commits the queued commands atomically.
    fn exec(&mut self) -> Result<()>;

    /// Drops the queued commands.
    fn discard(&mut self) -> Result<()>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn exists(&mut self, key: &str) -> Result<i64> {
        (**self).exists(key)
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set_ex(&mut self, key: &str, value: &[u8], seconds: u64) -> Result<()> {
        (**self).set_ex(key, value, seconds)
    }

    fn del(&mut self, key: &str) -> Result<()> {
        (**self).del(key)
    }

    fn flush_all(&mut self) -> Result<String> {
        (**self).flush_all()
    }

    fn multi(&mut self) -> Result<()> {
        (**self).multi()
    }

    fn exec(&mut self) -> Result<()> {
        (**self).exec()
    }

    fn discard(&mut self) -> Result<()> {
        (**self).discard()
    }
}
