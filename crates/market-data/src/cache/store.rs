use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use super::CacheKey;

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Result of a cache lookup. Stale entries are still returned so callers can
/// use them as a fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheLookup<V> {
    pub value: V,
    pub is_fresh: bool,
    pub age: Duration,
}

/// Process-lifetime keyed store.
///
/// Entries are replaced wholesale on [`set`](Self::set) and never swept;
/// freshness is decided per lookup from the caller's TTL. Clones share the
/// same map.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry<V>>>>,
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V: Clone> CacheStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a writer panicked mid-insert of a whole
    // entry; the map itself is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Cache store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Cache store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn get(&self, key: &CacheKey, ttl: Duration) -> Option<CacheLookup<V>> {
        let entries = self.read();
        let entry = entries.get(key)?;
        let age = entry.inserted_at.elapsed();
        Some(CacheLookup {
            value: entry.value.clone(),
            is_fresh: age < ttl,
            age,
        })
    }

    /// Convenience for lookups that only accept fresh values.
    pub fn get_fresh(&self, key: &CacheKey, ttl: Duration) -> Option<V> {
        self.get(key, ttl)
            .filter(|lookup| lookup.is_fresh)
            .map(|lookup| lookup.value)
    }

    pub fn set(&self, key: CacheKey, value: V) {
        self.write().insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}
