use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::db::Row;

/// Read-through cache contract used by the connection manager.
/// Entries are overwritten whole; readers never see a partial value.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<Row>>;
    fn set(&self, key: &str, rows: Vec<Row>, ttl: Duration);
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-process TTL cache. Expired entries are dropped lazily on lookup.
pub struct MemoryCache<V = Vec<Row>> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        MemoryCache { entries: Mutex::new(HashMap::new()) }
    }
}

impl<V: Clone> MemoryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_value(&self, key: &str) -> Option<V> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set_value(&self, key: &str, value: V, ttl: Duration) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry { value, expires_at: now + ttl },
        );
    }
}

impl Cache for MemoryCache<Vec<Row>> {
    fn get(&self, key: &str) -> Option<Vec<Row>> {
        self.get_value(key)
    }

    fn set(&self, key: &str, rows: Vec<Row>, ttl: Duration) {
        self.set_value(key, rows, ttl);
    }
}

/// HTTP-layer cache for whole JSON payloads.
pub type ResponseCache = MemoryCache<serde_json::Value>;
