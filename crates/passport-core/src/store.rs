//! Keyed storage for synthesized passports.
//!
//! Callers receive a store by injection instead of reaching for module-level
//! state. Each key is written at most once by the extraction flow, so the
//! in-memory implementation needs nothing beyond atomic map operations. A
//! multi-writer backend must serialize writes per key.

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait Store<K, V>: Send + Sync
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V>;

    async fn set(&self, key: K, value: V);

    async fn has(&self, key: &K) -> bool;
}

/// Process-lifetime map with no eviction.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> InMemoryStore<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<K, V> Store<K, V> for InMemoryStore<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: K, value: V) {
        self.entries.write().await.insert(key, value);
    }

    async fn has(&self, key: &K) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store: InMemoryStore<String, u32> = InMemoryStore::new();
        store.set("a".to_string(), 7).await;
        assert_eq!(store.get(&"a".to_string()).await, Some(7));
        assert!(store.has(&"a".to_string()).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store: InMemoryStore<String, u32> = InMemoryStore::new();
        assert_eq!(store.get(&"missing".to_string()).await, None);
        assert!(!store.has(&"missing".to_string()).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let store: std::sync::Arc<dyn Store<u64, String>> =
            std::sync::Arc::new(InMemoryStore::new());
        store.set(1, "one".to_string()).await;
        assert_eq!(store.get(&1).await.as_deref(), Some("one"));
    }
}
