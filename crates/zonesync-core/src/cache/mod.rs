// # Zone Record Cache
//
// In-memory snapshot of the flat records last read for each zone.
//
// ## Lifecycle
//
// - Read before write: `populate` consults the cache before the network
// - Written at most once per zone per populate call
// - Invalidated explicitly after every successful apply
//
// Concurrent populate calls against the same zone name are not coordinated;
// callers that need that must synchronise externally.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-zone record cache keyed by zone name
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct ZoneCache<T> {
    inner: Arc<RwLock<HashMap<String, Vec<T>>>>,
}

impl<T: Clone> ZoneCache<T> {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Cached records for `zone`, if any
    pub async fn get(&self, zone: &str) -> Option<Vec<T>> {
        let guard = self.inner.read().await;
        guard.get(zone).cloned()
    }

    pub async fn contains(&self, zone: &str) -> bool {
        self.inner.read().await.contains_key(zone)
    }

    /// Store a snapshot for `zone`, replacing any previous one
    pub async fn insert(&self, zone: &str, records: Vec<T>) {
        let mut guard = self.inner.write().await;
        guard.insert(zone.to_string(), records);
    }

    /// Drop the snapshot for `zone`. Returns whether one was present.
    pub async fn invalidate(&self, zone: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(zone).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl<T: Clone> Default for ZoneCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
