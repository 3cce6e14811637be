//! Transient query cache.
//!
//! Successful reads are kept per [`QueryKey`] for a TTL. Mutations call
//! [`QueryCache::invalidate`] for the resource they touched so the next read
//! goes back to the server. Nothing here outlives the process.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Resource name plus the filter parameters that shaped the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: String,
    params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: Vec::new(),
        }
    }

    /// Parameters are kept sorted so insertion order never splits the cache.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self.params.sort();
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

struct CachedEntry {
    value: Value,
    stored_at: Instant,
}

pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<QueryKey, CachedEntry>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        let mut entries = self.entries.lock().ok()?;
        let fresh = match entries.get(key) {
            Some(entry) => entry.stored_at.elapsed() < self.ttl,
            None => return None,
        };
        if !fresh {
            entries.remove(key);
            return None;
        }
        debug!(resource = key.resource(), "query cache hit");
        entries.get(key).map(|e| e.value.clone())
    }

    pub fn put(&self, key: QueryKey, value: Value) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key,
                CachedEntry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every cached query for `resource`, whatever its parameters.
    pub fn invalidate(&self, resource: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            let before = entries.len();
            entries.retain(|k, _| k.resource != resource);
            debug!(resource, dropped = before - entries.len(), "query cache invalidated");
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_order_does_not_matter() {
        let a = QueryKey::new("reports/sales")
            .with("startDate", "2026-10-01")
            .with("endDate", "2026-10-16");
        let b = QueryKey::new("reports/sales")
            .with("endDate", "2026-10-16")
            .with("startDate", "2026-10-01");
        assert_eq!(a, b);
    }

    #[test]
    fn fresh_entries_are_returned() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::new("tables");
        cache.put(key.clone(), json!([{ "id": 1 }]));
        assert_eq!(cache.get(&key), Some(json!([{ "id": 1 }])));
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.put(QueryKey::new("users"), json!([]));
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_evicted_on_read() {
        let cache = QueryCache::new(Duration::from_millis(1));
        let key = QueryKey::new("sales");
        cache.put(key.clone(), json!([]));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_drops_every_key_of_the_resource() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put(QueryKey::new("tables"), json!([]));
        cache.put(QueryKey::new("tables").with("id", 3), json!({}));
        cache.put(QueryKey::new("users"), json!([]));

        cache.invalidate("tables");

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&QueryKey::new("users")).is_some());
    }
}
