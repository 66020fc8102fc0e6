use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;

/// Expiry options for `set`, mirroring the cache client's `EX`/`PX` flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOptions {
    /// TTL in seconds
    pub ex: Option<u64>,
    /// TTL in milliseconds (takes precedence over `ex`)
    pub px: Option<u64>,
}

impl SetOptions {
    pub fn ex(seconds: u64) -> Self {
        Self {
            ex: Some(seconds),
            px: None,
        }
    }

    pub fn px(millis: u64) -> Self {
        Self {
            ex: None,
            px: Some(millis),
        }
    }
}

/// Cache client contract, matching the production client's operation set.
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Fetch a value; expired or missing keys resolve to `None`.
    async fn get(&self, key: &str) -> Result<Option<Value>, Box<dyn Error + Send + Sync>>;

    /// Store a value, optionally with a TTL.
    async fn set(
        &self,
        key: &str,
        value: Value,
        opts: SetOptions,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Remove a key. Returns the number of keys removed (0 or 1).
    async fn del(&self, key: &str) -> Result<u64, Box<dyn Error + Send + Sync>>;

    /// Increment an integer value, treating absent keys as 0.
    async fn incr(&self, key: &str) -> Result<i64, Box<dyn Error + Send + Sync>>;

    /// Set a TTL on an existing key. Returns 1 if applied, 0 if the key
    /// does not exist.
    async fn expire(&self, key: &str, seconds: u64) -> Result<u64, Box<dyn Error + Send + Sync>>;

    /// Seconds remaining before expiry: -1 if the key has no TTL, -2 if
    /// the key does not exist.
    async fn ttl(&self, key: &str) -> Result<i64, Box<dyn Error + Send + Sync>>;

    /// Fetch one field from a hash value.
    async fn hget(
        &self,
        key: &str,
        field: &str,
    ) -> Result<Option<Value>, Box<dyn Error + Send + Sync>>;

    /// Merge fields into a hash value. Returns the number of fields written.
    async fn hset(
        &self,
        key: &str,
        fields: HashMap<String, Value>,
    ) -> Result<u64, Box<dyn Error + Send + Sync>>;

    /// Add members to a set value. Returns the write count.
    async fn sadd(
        &self,
        key: &str,
        members: Vec<Value>,
    ) -> Result<u64, Box<dyn Error + Send + Sync>>;

    /// All members of a set value; absent keys resolve to an empty list.
    async fn smembers(&self, key: &str) -> Result<Vec<Value>, Box<dyn Error + Send + Sync>>;
}
