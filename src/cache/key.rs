//! Key Validation Module
//!
//! Cache keys are non-empty and limited to ASCII letters, digits, `.` and `-`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CacheError, Result};

static VALID_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.\-]+$").expect("key pattern compiles"));

// == Validate Key ==
/// Checks a single key against the allowed character set.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if !VALID_KEY.is_match(key) {
        return Err(CacheError::InvalidKey(format!(
            "Illegal character in key '{}'",
            key
        )));
    }
    Ok(())
}

// == Validate Keys ==
/// Validates a whole batch of keys, returning them as owned strings.
///
/// Fails on the first invalid key, before any of the batch is used.
pub fn validate_keys<I, K>(keys: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter()
        .map(|key| {
            let key = key.as_ref();
            validate_key(key)?;
            Ok(key.to_string())
        })
        .collect()
}
