//! Cache emulator: the production cache client's operation set served
//! entirely from the snapshot store.

use super::store::SnapshotStore;
use crate::ports::cache::{CachePort, SetOptions};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Once};

static INIT_LOG: Once = Once::new();

/// File-backed drop-in for the cache client.
#[derive(Clone)]
pub struct EmulatedCache {
    store: Arc<SnapshotStore>,
}

impl EmulatedCache {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        // Log once per process, not on every re-wiring.
        INIT_LOG.call_once(|| {
            println!(
                "[EmuCache] file-backed cache ready ({} keys, snapshot {:?})",
                store.len(),
                store.path()
            );
        });
        Self { store }
    }
}

#[async_trait]
impl CachePort for EmulatedCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, Box<dyn Error + Send + Sync>> {
        Ok(self.store.get(key))
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        opts: SetOptions,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.store.set(key, value, opts);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.store.del(key))
    }

    async fn incr(&self, key: &str) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.store.incr(key))
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.store.expire(key, seconds))
    }

    async fn ttl(&self, key: &str) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.store.ttl(key))
    }

    async fn hget(
        &self,
        key: &str,
        field: &str,
    ) -> Result<Option<Value>, Box<dyn Error + Send + Sync>> {
        Ok(self.store.hget(key, field))
    }

    async fn hset(
        &self,
        key: &str,
        fields: HashMap<String, Value>,
    ) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.store.hset(key, fields))
    }

    async fn sadd(
        &self,
        key: &str,
        members: Vec<Value>,
    ) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.store.sadd(key, members))
    }

    async fn smembers(&self, key: &str) -> Result<Vec<Value>, Box<dyn Error + Send + Sync>> {
        Ok(self.store.smembers(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn cache() -> (tempfile::TempDir, Arc<dyn CachePort>) {
        let dir = tempdir().unwrap();
        let store = Arc::new(SnapshotStore::open(dir.path().join("cache.json")));
        (dir, Arc::new(EmulatedCache::new(store)))
    }

    #[tokio::test]
    async fn behaves_like_the_production_client_through_the_port() {
        let (_dir, cache) = cache();

        cache
            .set("session:1", json!({"user": "devuser"}), SetOptions::default())
            .await
            .unwrap();
        assert_eq!(
            cache.get("session:1").await.unwrap(),
            Some(json!({"user": "devuser"}))
        );

        assert_eq!(cache.incr("hits").await.unwrap(), 1);
        assert_eq!(cache.del("session:1").await.unwrap(), 1);
        assert_eq!(cache.get("session:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn ttl_sentinels_pass_through() {
        let (_dir, cache) = cache();

        assert_eq!(cache.ttl("absent").await.unwrap(), -2);
        cache
            .set("k", json!(1), SetOptions::ex(30))
            .await
            .unwrap();
        assert!(cache.ttl("k").await.unwrap() > 0);
    }
}
