//! Name-to-record cache.

use dashmap::DashMap;
use waypoint_core::ServiceRecord;

/// Cache of resolved service records.
///
/// A name is present if and only if it was successfully resolved since
/// it was last invalidated. Entries never expire and there is no capacity
/// bound. Each operation is atomic on its own; nothing spans several.
///
/// ## Example
///
/// ```rust
/// use waypoint_discovery::ServiceCache;
/// use waypoint_core::ServiceRecord;
///
/// let cache = ServiceCache::new();
/// cache.put("orders", ServiceRecord::new("tcp://10.0.0.4:8080".into()));
/// assert!(cache.contains("orders"));
///
/// cache.remove("orders");
/// assert!(cache.get("orders").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ServiceCache {
    entries: DashMap<String, ServiceRecord>,
}

impl ServiceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get the cached record for a service.
    #[must_use]
    pub fn get(&self, service: &str) -> Option<ServiceRecord> {
        self.entries.get(service).map(|e| e.value().clone())
    }

    /// Store a record, replacing any previous one.
    pub fn put(&self, service: impl Into<String>, record: ServiceRecord) {
        self.entries.insert(service.into(), record);
    }

    /// Drop a service's entry. No-op if absent.
    pub fn remove(&self, service: &str) {
        self.entries.remove(service);
    }

    /// Check whether a service is cached.
    #[must_use]
    pub fn contains(&self, service: &str) -> bool {
        self.entries.contains_key(service)
    }

    /// Number of cached services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_put_overwrites() {
        let cache = ServiceCache::new();
        cache.put("orders", ServiceRecord::new(json!({"port": 1})));
        cache.put("orders", ServiceRecord::new(json!({"port": 2})));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("orders").unwrap().as_value(), &json!({"port": 2}));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cache = ServiceCache::new();
        cache.remove("ghost");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ServiceCache::new();
        cache.put("a", ServiceRecord::new(json!(1)));
        cache.put("b", ServiceRecord::new(json!(2)));
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ServiceCache::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("svc-{t}-{i}");
                        cache.put(name.clone(), ServiceRecord::new(json!(i)));
                        assert!(cache.get(&name).is_some());
                        if i % 2 == 0 {
                            cache.remove(&name);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 8 * 50);
    }
}
