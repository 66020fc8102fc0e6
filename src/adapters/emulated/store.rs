//! Keyed persistent store backing the emulators.
//!
//! A process-wide map mirrored to a JSON snapshot file on every mutation.
//! The in-memory state is authoritative; disk failures only degrade
//! durability, they never surface to callers.

use crate::domain::video::now_ms;
use crate::ports::cache::SetOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// One stored value plus its optional expiry deadline.
///
/// An entry past its deadline is logically absent; it is pruned on the
/// next read that touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
}

impl StoreEntry {
    fn expired(&self, now: u64) -> bool {
        matches!(self.expiry, Some(deadline) if now > deadline)
    }
}

/// Process-wide registry so every consumer of the same snapshot file
/// shares one store instance. Initialized once, never torn down; the
/// store only dies with the process.
static STORES: OnceLock<Mutex<HashMap<PathBuf, Arc<SnapshotStore>>>> = OnceLock::new();

/// Durable map from string keys to JSON values, rewritten wholesale to
/// its snapshot file on every mutation.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, StoreEntry>>,
}

impl SnapshotStore {
    /// Open a store backed by `path`, loading the existing snapshot if
    /// one is present. A missing file starts empty; an unreadable or
    /// malformed one is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("[Store] failed to create {:?}: {}", parent, e);
            }
        }

        let entries = match std::fs::read(&path) {
            Ok(data) if data.is_empty() => HashMap::new(),
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!(
                        "[Store] malformed snapshot {:?}, starting fresh: {}",
                        path, e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                eprintln!("[Store] unreadable snapshot {:?}, starting fresh: {}", path, e);
                HashMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Fetch (or create) the process-wide store for `path`. Subsequent
    /// calls with the same path return the same instance, so state
    /// survives re-wiring within one process.
    pub fn open_global(path: impl AsRef<Path>) -> Arc<SnapshotStore> {
        let registry = STORES.get_or_init(|| Mutex::new(HashMap::new()));
        let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .entry(path.as_ref().to_path_buf())
            .or_insert_with(|| Arc::new(SnapshotStore::open(path.as_ref())))
            .clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoreEntry>> {
        // A poisoned lock would otherwise take local dev down with it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Rewrite the full snapshot file. Failures are logged and swallowed;
    /// the in-memory state stays authoritative for the rest of the
    /// process lifetime.
    fn flush(&self, entries: &HashMap<String, StoreEntry>) {
        match serde_json::to_vec_pretty(entries) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&self.path, data) {
                    eprintln!("[Store] snapshot write to {:?} failed: {}", self.path, e);
                }
            }
            Err(e) => eprintln!("[Store] snapshot serialization failed: {}", e),
        }
    }

    /// Number of live keys (including not-yet-pruned expired entries).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) => entry.expired(now_ms()),
            None => return None,
        };
        if expired {
            // Prune lazily and persist the pruned state.
            entries.remove(key);
            self.flush(&entries);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: &str, value: Value, opts: SetOptions) {
        let mut expiry = None;
        if let Some(ex) = opts.ex {
            expiry = Some(now_ms() + ex * 1000);
        }
        if let Some(px) = opts.px {
            expiry = Some(now_ms() + px);
        }

        let mut entries = self.lock();
        entries.insert(key.to_string(), StoreEntry { value, expiry });
        self.flush(&entries);
    }

    pub fn del(&self, key: &str) -> u64 {
        let mut entries = self.lock();
        let removed = entries.remove(key).is_some();
        if removed {
            self.flush(&entries);
        }
        removed as u64
    }

    /// Increment an integer value; absent or non-numeric values count as
    /// 0. The previous expiry, if any, is not carried over.
    pub fn incr(&self, key: &str) -> i64 {
        let mut entries = self.lock();
        let current = entries
            .get(key)
            .and_then(|entry| entry.value.as_i64())
            .unwrap_or(0);
        let next = current + 1;
        entries.insert(
            key.to_string(),
            StoreEntry {
                value: Value::from(next),
                expiry: None,
            },
        );
        self.flush(&entries);
        next
    }

    pub fn expire(&self, key: &str, seconds: u64) -> u64 {
        let mut entries = self.lock();
        match entries.get_mut(key) {
            Some(entry) => {
                entry.expiry = Some(now_ms() + seconds * 1000);
                self.flush(&entries);
                1
            }
            None => 0,
        }
    }

    /// Seconds remaining before expiry; -1 when the key has no TTL, -2
    /// when the key is absent.
    pub fn ttl(&self, key: &str) -> i64 {
        let entries = self.lock();
        match entries.get(key) {
            None => -2,
            Some(entry) => match entry.expiry {
                None => -1,
                Some(deadline) => {
                    let now = now_ms();
                    ((deadline.saturating_sub(now)) / 1000) as i64
                }
            },
        }
    }

    pub fn hget(&self, key: &str, field: &str) -> Option<Value> {
        let entries = self.lock();
        entries
            .get(key)
            .and_then(|entry| entry.value.as_object())
            .and_then(|map| map.get(field))
            .cloned()
    }

    /// Merge fields into an object value. Returns the number of fields
    /// written. Non-object current values are replaced; the previous
    /// expiry is not carried over.
    pub fn hset(&self, key: &str, fields: HashMap<String, Value>) -> u64 {
        let count = fields.len() as u64;
        let mut entries = self.lock();
        let mut map = entries
            .get(key)
            .and_then(|entry| entry.value.as_object())
            .cloned()
            .unwrap_or_default();
        for (field, value) in fields {
            map.insert(field, value);
        }
        entries.insert(
            key.to_string(),
            StoreEntry {
                value: Value::Object(map),
                expiry: None,
            },
        );
        self.flush(&entries);
        count
    }

    /// Add members to an array value, deduplicating. Returns the number
    /// of members passed, matching the emulated client's contract.
    pub fn sadd(&self, key: &str, members: Vec<Value>) -> u64 {
        let count = members.len() as u64;
        let mut entries = self.lock();
        let mut set = entries
            .get(key)
            .and_then(|entry| entry.value.as_array())
            .cloned()
            .unwrap_or_default();
        for member in members {
            if !set.contains(&member) {
                set.push(member);
            }
        }
        entries.insert(
            key.to_string(),
            StoreEntry {
                value: Value::Array(set),
                expiry: None,
            },
        );
        self.flush(&entries);
        count
    }

    pub fn smembers(&self, key: &str) -> Vec<Value> {
        let entries = self.lock();
        entries
            .get(key)
            .and_then(|entry| entry.value.as_array())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        store.set("greeting", json!({"hello": "world"}), SetOptions::default());
        assert_eq!(store.get("greeting"), Some(json!({"hello": "world"})));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn state_survives_a_simulated_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = SnapshotStore::open(&path);
        store.set("k", json!(42), SetOptions::default());
        drop(store);

        let reloaded = SnapshotStore::open(&path);
        assert_eq!(reloaded.get("k"), Some(json!(42)));
    }

    #[test]
    fn expired_entries_read_as_absent_and_get_pruned() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        store.set("short", json!("lived"), SetOptions::px(30));
        assert_eq!(store.get("short"), Some(json!("lived")));

        std::thread::sleep(std::time::Duration::from_millis(60));
        assert_eq!(store.get("short"), None);
        // Pruned by the read, so the key is now fully absent.
        assert_eq!(store.ttl("short"), -2);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn ttl_reports_the_documented_sentinel_codes() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        assert_eq!(store.ttl("absent"), -2);

        store.set("plain", json!(1), SetOptions::default());
        assert_eq!(store.ttl("plain"), -1);

        store.set("timed", json!(1), SetOptions::ex(30));
        let remaining = store.ttl("timed");
        assert!((28..=30).contains(&remaining), "remaining = {}", remaining);
    }

    #[test]
    fn expire_applies_only_to_existing_keys() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        assert_eq!(store.expire("absent", 10), 0);
        store.set("k", json!(1), SetOptions::default());
        assert_eq!(store.expire("k", 10), 1);
        assert!(store.ttl("k") >= 9);
    }

    #[test]
    fn del_reports_whether_a_key_was_removed() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        store.set("k", json!(1), SetOptions::default());
        assert_eq!(store.del("k"), 1);
        assert_eq!(store.del("k"), 0);
    }

    #[test]
    fn incr_counts_from_zero_and_ignores_junk() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        assert_eq!(store.incr("views"), 1);
        assert_eq!(store.incr("views"), 2);

        store.set("views", json!("not a number"), SetOptions::default());
        assert_eq!(store.incr("views"), 1);
    }

    #[test]
    fn hash_fields_merge_into_the_existing_object() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        let mut first = HashMap::new();
        first.insert(String::from("a"), json!(1));
        assert_eq!(store.hset("h", first), 1);

        let mut second = HashMap::new();
        second.insert(String::from("b"), json!(2));
        store.hset("h", second);

        assert_eq!(store.hget("h", "a"), Some(json!(1)));
        assert_eq!(store.hget("h", "b"), Some(json!(2)));
        assert_eq!(store.hget("h", "c"), None);
        assert_eq!(store.hget("missing", "a"), None);
    }

    #[test]
    fn set_members_deduplicate() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("cache.json"));

        assert_eq!(store.sadd("tags", vec![json!("a"), json!("b")]), 2);
        store.sadd("tags", vec![json!("b"), json!("c")]);

        let members = store.smembers("tags");
        assert_eq!(members, vec![json!("a"), json!("b"), json!("c")]);
        assert!(store.smembers("missing").is_empty());
    }

    #[test]
    fn malformed_snapshot_starts_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = SnapshotStore::open(&path);
        assert!(store.is_empty());

        // The store stays usable and persists over the bad file.
        store.set("k", json!(1), SetOptions::default());
        let reloaded = SnapshotStore::open(&path);
        assert_eq!(reloaded.get("k"), Some(json!(1)));
    }

    #[test]
    fn open_global_returns_one_instance_per_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.json");

        let first = SnapshotStore::open_global(&path);
        let second = SnapshotStore::open_global(&path);
        assert!(Arc::ptr_eq(&first, &second));

        first.set("k", json!(1), SetOptions::default());
        assert_eq!(second.get("k"), Some(json!(1)));
    }
}
