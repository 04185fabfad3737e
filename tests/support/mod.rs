//! Shared cache contract checks, run against every store implementation.

#![allow(dead_code)]

use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use redis_simple_cache::{CacheError, Interval, SimpleCache, Store, Ttl};
use serde::{Deserialize, Serialize};

/// Default TTL every suite pins, so the default-TTL key expires first.
pub const DEFAULT_TTL: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub foo: String,
}

pub const VALID_KEYS: &[&str] = &[
    "AbC19-.",
    "1234567890123456789012345678901234567890123456789012345678901234",
    "0",
];

pub const INVALID_KEYS: &[&str] = &[
    "", "{str", "rand{", "rand{str", "rand}str", "rand(str", "rand)str", "rand/str", "rand\\str",
    "rand@str", "rand:str",
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_simple_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn get_string<S: Store>(cache: &mut SimpleCache<S>, key: &str) -> Option<String> {
    cache.get(key).unwrap()
}

// == Single Values ==

pub fn unknown_values<S: Store>(cache: &mut SimpleCache<S>) {
    assert_eq!(get_string(cache, "key"), None, "Returns none on unknown key");
    assert!(!cache.has("key").unwrap(), "has() is false on unknown key");
}

pub fn set_single_values<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value1", None).unwrap();
    cache.set("key2", "value2", Some(Ttl::Seconds(2))).unwrap();
    cache
        .set("key3", "value3", Some(Interval::seconds(2).into()))
        .unwrap();

    for (key, value) in [("key1", "value1"), ("key2", "value2"), ("key3", "value3")] {
        assert!(cache.has(key).unwrap(), "has() returns true for {}", key);
        assert_eq!(get_string(cache, key).as_deref(), Some(value));
    }
}

pub fn set_expired_ttl<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value", None).unwrap();
    cache.set("key1", "value", Some(Ttl::Seconds(0))).unwrap();
    cache.set("key2", "value", None).unwrap();
    cache.set("key2", "value", Some(Ttl::Seconds(-1))).unwrap();

    assert_eq!(get_string(cache, "key1"), None, "0 TTL results in deleted value");
    assert_eq!(get_string(cache, "key2"), None, "negative TTL results in deleted value");
    assert!(!cache.has("key1").unwrap());
    assert!(!cache.has("key2").unwrap());
}

pub fn delete_value<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value", None).unwrap();

    assert!(cache.delete("key1").is_ok());
    assert!(
        cache.delete("key2").is_ok(),
        "Deleting a value that does not exist succeeds"
    );

    assert_eq!(get_string(cache, "key1"), None);
    assert!(!cache.has("key1").unwrap());
}

pub fn clear<S: Store>(cache: &mut SimpleCache<S>) {
    assert!(cache.clear().unwrap(), "Clearing an empty cache succeeds");
    cache.set("key", "value", None).unwrap();
    assert!(cache.clear().unwrap(), "Clearing a non-empty cache succeeds");

    assert_eq!(get_string(cache, "key"), None);
    assert!(!cache.has("key").unwrap());
}

// == Bulk Values ==

pub fn set_multiple<S: Store>(cache: &mut SimpleCache<S>) {
    cache
        .set_multiple([("0", "value0"), ("key1", "value1"), ("key2", "value2")], None)
        .unwrap();

    assert_eq!(get_string(cache, "0").as_deref(), Some("value0"), "Numeric keys are keys");
    assert_eq!(get_string(cache, "key1").as_deref(), Some("value1"));
    assert_eq!(get_string(cache, "key2").as_deref(), Some("value2"));
}

pub fn set_multiple_with_expired_ttl<S: Store>(cache: &mut SimpleCache<S>) {
    cache
        .set_multiple([("key1", "value"), ("key2", "value")], Some(Ttl::Seconds(0)))
        .unwrap();
    cache
        .set_multiple([("key3", "value"), ("key4", "value")], Some(Ttl::Seconds(-2)))
        .unwrap();

    for key in ["key1", "key2", "key3", "key4"] {
        assert_eq!(get_string(cache, key), None, "{} is not present", key);
        assert!(!cache.has(key).unwrap(), "{} is not present", key);
    }
}

pub fn get_multiple<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value", None).unwrap();
    cache.set("key2", "value2", None).unwrap();

    let actual = cache
        .get_multiple(["key1", "key2", "key3"], None::<String>)
        .unwrap();

    let expected = HashMap::from([
        ("key1".to_string(), Some("value".to_string())),
        ("key2".to_string(), Some("value2".to_string())),
        ("key3".to_string(), None),
    ]);
    assert_eq!(actual, expected);
}

pub fn get_multiple_with_default<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value", None).unwrap();
    cache.set("key2", "value2", None).unwrap();

    let actual = cache
        .get_multiple(["key1", "key2", "key3"], "default value".to_string())
        .unwrap();

    assert_eq!(actual["key1"], "value");
    assert_eq!(actual["key2"], "value2");
    assert_eq!(actual["key3"], "default value");
}

pub fn delete_multiple<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value1", None).unwrap();
    cache.set("key2", "value2", None).unwrap();

    assert!(cache.delete_multiple(Vec::<String>::new()).is_ok(), "Empty batch succeeds");
    assert!(cache.delete_multiple(["key"]).is_ok(), "Missing key succeeds");
    assert!(cache.delete_multiple(["key1", "key2"]).is_ok());

    assert_eq!(get_string(cache, "key1"), None);
    assert_eq!(get_string(cache, "key2"), None);
}

pub fn delete_multiple_partially_present<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key1", "value", None).unwrap();

    assert!(cache.delete_multiple(["key1", "key2"]).is_ok());

    assert!(!cache.has("key1").unwrap());
    assert!(!cache.has("key2").unwrap());
}

pub fn bulk_operations_accept_iterators<S: Store>(cache: &mut SimpleCache<S>) {
    let pairs = (1..=2).map(|i| (format!("key{}", i), format!("value{}", i)));
    cache.set_multiple(pairs, None).unwrap();
    assert_eq!(get_string(cache, "key2").as_deref(), Some("value2"));

    cache.delete("key2").unwrap();
    let keys = (1..=2).map(|i| format!("key{}", i));
    let values = cache.get_multiple(keys, None::<String>).unwrap();
    assert_eq!(values["key1"].as_deref(), Some("value1"));
    assert_eq!(values["key2"], None);

    let keys = (1..=2).map(|i| format!("key{}", i));
    cache.delete_multiple(keys).unwrap();
    assert!(!cache.has("key1").unwrap());
}

pub fn long_keys<S: Store>(cache: &mut SimpleCache<S>) {
    let key1 = "a".repeat(300);
    let key2 = "b".repeat(300);
    let key3 = "c".repeat(300);

    cache.set(&key1, "value", None).unwrap();
    cache.set(&key2, "value", None).unwrap();
    cache.delete(&key2).unwrap();

    assert!(cache.has(&key1).unwrap());
    assert_eq!(get_string(cache, &key1).as_deref(), Some("value"));
    assert!(!cache.has(&key2).unwrap(), "Can delete with very long key");
    assert_eq!(get_string(cache, &key3), None, "Can check non-existing long key");
}

// == Validation ==

pub fn invalid_keys_rejected<S: Store>(cache: &mut SimpleCache<S>) {
    for &key in INVALID_KEYS {
        let invalid = |err: CacheError| err.is_validation();

        assert!(cache.get::<String>(key).is_err_and(invalid), "get({:?})", key);
        assert!(cache.set(key, "value", None).is_err_and(invalid), "set({:?})", key);
        assert!(cache.has(key).is_err_and(invalid), "has({:?})", key);
        assert!(cache.delete(key).is_err_and(invalid), "delete({:?})", key);
        assert!(
            cache
                .get_multiple(["key1", key, "key2"], None::<String>)
                .is_err_and(invalid),
            "get_multiple({:?})",
            key
        );
        assert!(
            cache
                .set_multiple([("key1", "value1"), (key, "value"), ("key2", "value2")], None)
                .is_err_and(invalid),
            "set_multiple({:?})",
            key
        );
        assert!(
            cache
                .delete_multiple(["key1", key, "key2"])
                .is_err_and(invalid),
            "delete_multiple({:?})",
            key
        );
    }

    assert!(!cache.has("key1").unwrap(), "Rejected batches write nothing");
    assert!(!cache.has("key2").unwrap(), "Rejected batches write nothing");
}

pub fn invalid_ttl_rejected<S: Store>(cache: &mut SimpleCache<S>) {
    for input in ["", "true", "false", "abc", "2.5", " 1", "12foo", "025"] {
        let err = input.parse::<Ttl>().unwrap_err();
        assert!(err.is_validation(), "{:?} must be a validation error", input);
    }
    assert!(!cache.has("key").unwrap());
}

pub fn valid_keys<S: Store>(cache: &mut SimpleCache<S>) {
    for &key in VALID_KEYS {
        cache.set(key, "foobar", None).unwrap();
        assert_eq!(get_string(cache, key).as_deref(), Some("foobar"));

        cache.set_multiple([(key, "value")], None).unwrap();
        let values = cache.get_multiple([key], None::<String>).unwrap();
        assert_eq!(values[key].as_deref(), Some("value"), "Can use valid key {}", key);
    }
}

// == Data Types ==

pub fn null_overwrite<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key", &Some(5), None).unwrap();
    cache.set("key", &None::<i32>, None).unwrap();

    assert_eq!(
        cache.get::<Option<i32>>("key").unwrap(),
        Some(None),
        "Setting none overwrites the previous value"
    );
}

pub fn data_types<S: Store>(cache: &mut SimpleCache<S>) {
    cache.set("key", "5", None).unwrap();
    assert_eq!(cache.get::<String>("key").unwrap().as_deref(), Some("5"));

    cache.set("key", &5i64, None).unwrap();
    assert_eq!(cache.get::<i64>("key").unwrap(), Some(5));

    let float = 1.23456789f64;
    cache.set("key", &float, None).unwrap();
    let cached = cache.get::<f64>("key").unwrap().unwrap();
    assert!((cached - float).abs() < 1e-12);

    cache.set("key", &false, None).unwrap();
    assert_eq!(cache.get::<bool>("key").unwrap(), Some(false));
    assert!(cache.has("key").unwrap(), "has() is true when false is stored");

    let map = HashMap::from([("a".to_string(), "foo".to_string()), ("2".to_string(), "bar".to_string())]);
    cache.set("key", &map, None).unwrap();
    assert_eq!(cache.get::<HashMap<String, String>>("key").unwrap(), Some(map));

    let sample = Sample {
        foo: "value".to_string(),
    };
    cache.set("key", &sample, None).unwrap();
    assert_eq!(cache.get::<Sample>("key").unwrap(), Some(sample));
}

pub fn binary_data<S: Store>(cache: &mut SimpleCache<S>) {
    let bytes: Vec<u8> = (0..=255u8).collect();
    cache.set("key", &bytes, None).unwrap();
    assert_eq!(cache.get::<Vec<u8>>("key").unwrap(), Some(bytes));

    let chars: String = (0..=255u8).map(char::from).collect();
    cache.set("key", &chars, None).unwrap();
    assert_eq!(cache.get::<String>("key").unwrap(), Some(chars));
}

pub fn object_as_default_value<S: Store>(cache: &mut SimpleCache<S>) {
    let sample = Sample {
        foo: "value".to_string(),
    };
    assert_eq!(cache.get_or("key", sample.clone()).unwrap(), sample);
}

pub fn object_does_not_change_in_cache<S: Store>(cache: &mut SimpleCache<S>) {
    let mut sample = Sample {
        foo: "value".to_string(),
    };
    cache.set("key", &sample, None).unwrap();
    sample.foo = "changed".to_string();

    let cached = cache.get::<Sample>("key").unwrap().unwrap();
    assert_eq!(cached.foo, "value", "Cached objects do not follow later changes");
}

// == Expiry ==

/// Sleeps past the default TTL, then past the explicit ones.
///
/// Expiry is enforced by the store, so time cannot be faked here.
pub fn values_expire_after_ttl<S: Store>(cache: &mut SimpleCache<S>) {
    assert_eq!(cache.default_ttl(), DEFAULT_TTL);

    cache.set("key1", "value", None).unwrap();
    cache.set("key2", "value", Some(Ttl::Seconds(3))).unwrap();
    cache
        .set("key3", "value", Some(Interval::seconds(3).into()))
        .unwrap();
    cache
        .set_multiple([("key4", "value"), ("key5", "value")], Some(Ttl::Seconds(3)))
        .unwrap();
    cache
        .set_multiple(
            [("key6", "value"), ("key7", "value")],
            Some(Interval::seconds(3).into()),
        )
        .unwrap();

    sleep(Duration::from_secs(2));
    assert_eq!(get_string(cache, "key1"), None, "Default TTL (1s) is applied");
    assert!(!cache.has("key1").unwrap(), "Default TTL (1s) is applied");
    assert!(cache.has("key2").unwrap(), "Explicit TTL outlives the default");

    sleep(Duration::from_secs(2));
    for key in ["key2", "key3", "key4", "key5", "key6", "key7"] {
        assert_eq!(get_string(cache, key), None, "{} must expire after 3s", key);
        assert!(!cache.has(key).unwrap(), "{} must expire after 3s", key);
    }
}
