//! Cache Module
//!
//! The cache interface over a remote store: key validation, TTL resolution,
//! value encoding and transactional batch deletes.

mod batch;
mod codec;
mod key;
mod simple;
mod ttl;


// Re-export public types
pub use batch::run_transaction;
pub use codec::{Codec, JsonCodec};
pub use key::{validate_key, validate_keys};
pub use simple::SimpleCache;
pub use ttl::{resolve_ttl, Interval, Ttl};
