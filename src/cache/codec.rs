//! Codec Module
//!
//! Values are opaque to the store; a codec turns them into bytes and back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

// == Codec ==
/// Encodes values for transport and decodes them on read.
///
/// The only contract is round-trip fidelity: `decode(encode(v)) == v`.
pub trait Codec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

// == JSON Codec ==
/// Default codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
